mod classifier;
mod failures;
