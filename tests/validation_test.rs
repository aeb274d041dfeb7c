//! Integration tests for image dimension validation against real files.

use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use filevault::validation::{measure, validate, validate_file, ImageSource, UploadDescriptor};
use filevault_common::{Comparison, DimensionConstraints, Dimensions, Error, Operator};
use image::{ImageBuffer, Rgb};
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb([200, 30, 30]));
    img.save(&path).expect("failed to write test image");
    path
}

fn height_eq(value: u32) -> DimensionConstraints {
    DimensionConstraints::height(Comparison::new(Operator::Eq, value))
}

#[test]
fn exact_height_constraint() {
    assert!(validate(Dimensions::new(100, 100), &height_eq(100)).unwrap());
    assert!(!validate(Dimensions::new(100, 50), &height_eq(100)).unwrap());
}

#[test]
fn missing_constraints_are_rejected() {
    assert_matches!(
        validate(Dimensions::new(100, 100), &DimensionConstraints::default()),
        Err(Error::InvalidArgument(_))
    );
}

#[test]
fn measures_png_on_disk() {
    let dir = TempDir::new().unwrap();
    let square = write_png(dir.path(), "square.png", 100, 100);
    let wide = write_png(dir.path(), "wide.png", 100, 50);

    assert_eq!(measure(&square).unwrap(), Dimensions::new(100, 100));
    assert!(validate_file(square.as_path(), &height_eq(100)).unwrap());
    assert!(!validate_file(wide.as_path(), &height_eq(100)).unwrap());
}

#[test]
fn upload_descriptor_is_measured_from_tmp_name() {
    let dir = TempDir::new().unwrap();
    // Spooled uploads usually have no extension.
    let spooled = write_png(dir.path(), "upload.png", 320, 240);
    let tmp_name = dir.path().join("upload-a1b2c3");
    std::fs::rename(&spooled, &tmp_name).unwrap();

    let upload = UploadDescriptor {
        tmp_name,
        name: Some("holiday.png".to_string()),
        size: None,
        mime_type: Some("image/png".to_string()),
    };
    let constraints = DimensionConstraints::width(Comparison::new(Operator::Le, 400))
        .with_height(Comparison::new(Operator::Gt, 200));

    assert!(validate_file(ImageSource::Upload(upload), &constraints).unwrap());
}

#[test]
fn upload_descriptor_deserializes_from_form_fields() {
    let upload: UploadDescriptor = serde_json::from_str(
        r#"{"tmp_name": "/tmp/upload-xyz", "name": "me.jpg", "size": 1024, "type": "image/jpeg"}"#,
    )
    .unwrap();
    assert_eq!(upload.tmp_name, PathBuf::from("/tmp/upload-xyz"));
    assert_eq!(upload.mime_type.as_deref(), Some("image/jpeg"));
}

#[test]
fn missing_file_is_image_error() {
    let dir = TempDir::new().unwrap();
    assert_matches!(
        validate_file(dir.path().join("gone.png"), &height_eq(1)),
        Err(Error::Image(_))
    );
}
