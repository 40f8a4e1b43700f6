use crate::{ChangeClassifier, ChangeEvent, ChangeKind, UnsupportedChange};

use std::path::{Path, PathBuf};

fn classifier() -> ChangeClassifier {
    ChangeClassifier::new(
        "/project",
        &[PathBuf::from("Assets"), PathBuf::from("Packages")],
    )
}

#[test]
fn given_assembly_definition_when_classified_then_requires_recompile() {
    // Given
    let event = ChangeEvent::file("Foo.asmdef", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert_eq!(
        result.kind,
        ChangeKind::UnsupportedRequiresRecompile(UnsupportedChange::AssemblyFileEdit)
    );
}

#[test]
fn given_response_file_in_source_root_when_classified_then_assembly_edit() {
    let event = ChangeEvent::file("/project/Assets/csc.rsp", true);

    let result = classifier().classify(&event);

    assert_eq!(
        result.unsupported_change(),
        Some(UnsupportedChange::AssemblyFileEdit)
    );
}

#[test]
fn given_native_plugin_when_classified_then_native_plugin_edit() {
    // Given
    let event = ChangeEvent::file("Plugin.dll", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert_eq!(
        result.unsupported_change(),
        Some(UnsupportedChange::NativePluginEdit)
    );
}

#[test]
fn given_uppercase_plugin_extension_when_classified_then_native_plugin_edit() {
    let event = ChangeEvent::file("/project/Assets/Plugins/Native.SO", false);

    let result = classifier().classify(&event);

    assert_eq!(
        result.unsupported_change(),
        Some(UnsupportedChange::NativePluginEdit)
    );
}

#[test]
fn given_source_file_when_classified_then_ignored() {
    // Given
    let event = ChangeEvent::file("/project/Assets/Script.cs", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert!(result.is_ignored());
}

#[test]
fn given_bare_source_file_name_when_classified_then_ignored() {
    assert!(classifier()
        .classify(&ChangeEvent::file("Script.cs", true))
        .is_ignored());
}

#[test]
fn given_scene_and_meta_files_when_classified_then_ignored() {
    for path in [
        "/project/Assets/Main.unity",
        "/project/Assets/Texture.png.meta",
        "/project/Assets/Game.pdb",
    ] {
        assert!(
            classifier().classify(&ChangeEvent::file(path, true)).is_ignored(),
            "{path} should be ignored"
        );
    }
}

#[test]
fn given_texture_inside_tracked_root_when_classified_then_hot_patchable() {
    // Given
    let event = ChangeEvent::file("/project/Assets/Textures/Texture.png", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert_eq!(
        result.kind,
        ChangeKind::HotPatchable {
            relative_path: PathBuf::from("Assets/Textures/Texture.png")
        }
    );
}

#[test]
fn given_relative_path_inside_packages_when_classified_then_hot_patchable() {
    let event = ChangeEvent::file("Packages/com.acme/icon.png", false);

    let result = classifier().classify(&event);

    assert_eq!(
        result.kind,
        ChangeKind::HotPatchable {
            relative_path: PathBuf::from("Packages/com.acme/icon.png")
        }
    );
}

#[test]
fn given_path_outside_tracked_roots_when_classified_then_ignored() {
    // Given
    let event = ChangeEvent::file("/project/Library/Texture.png", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert!(result.is_ignored());
}

#[test]
fn given_sibling_directory_with_root_prefix_when_classified_then_ignored() {
    let event = ChangeEvent::file("/project/AssetsBackup/Texture.png", true);

    assert!(classifier().classify(&event).is_ignored());
}

#[test]
fn given_parent_dir_escaping_tracked_root_when_classified_then_ignored() {
    // Given
    let event = ChangeEvent::file("/project/Assets/../Library/x.png", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert!(result.is_ignored());
}

#[test]
fn given_relative_path_escaping_project_when_classified_then_ignored() {
    let event = ChangeEvent::file("Assets/../../etc/x.png", false);

    assert!(classifier().classify(&event).is_ignored());
}

#[test]
fn given_dot_segments_inside_tracked_root_when_classified_then_relative_path_normalized() {
    // Given
    let event = ChangeEvent::file("/project/./Assets/Old/../Textures/x.png", true);

    // When
    let result = classifier().classify(&event);

    // Then
    assert_eq!(
        result.kind,
        ChangeKind::HotPatchable {
            relative_path: PathBuf::from("Assets/Textures/x.png")
        }
    );
}

#[test]
fn given_current_dir_project_root_when_classified_then_tracked_root_matched() {
    let classifier = ChangeClassifier::new(".", &[PathBuf::from("Assets")]);
    let event = ChangeEvent::file("./Assets/icon.png", true);

    let result = classifier.classify(&event);

    assert_eq!(
        result.kind,
        ChangeKind::HotPatchable {
            relative_path: PathBuf::from("Assets/icon.png")
        }
    );
}

#[test]
fn given_directory_when_classified_then_ignored() {
    // Given
    let event = ChangeEvent::directory("/project/Assets/Plugins.dll");

    // When
    let result = classifier().classify(&event);

    // Then
    assert!(result.is_ignored());
}

#[test]
fn given_same_event_when_classified_twice_then_same_result() {
    let event = ChangeEvent::file("/project/Assets/a.png", true);
    let classifier = classifier();

    assert_eq!(classifier.classify(&event), classifier.classify(&event));
    assert_eq!(classifier.project_root(), Path::new("/project"));
}

#[test]
fn given_existing_directory_when_observed_then_marked_as_dir() {
    // Given
    let dir = tempfile::tempdir().unwrap();

    // When
    let event = ChangeEvent::observe(dir.path());

    // Then
    assert!(event.exists);
    assert!(event.is_dir);
}

#[test]
fn given_missing_path_when_observed_then_marked_deleted() {
    let dir = tempfile::tempdir().unwrap();

    let event = ChangeEvent::observe(&dir.path().join("gone.png"));

    assert!(!event.exists);
    assert!(!event.is_dir);
}
