use cvwizard_pipeline::{Stage, Status};

#[test]
fn status_text_is_literal() {
    let expected = [
        (Status::UploadingFile, "Uploading the file..."),
        (Status::ConvertingToImage, "Converting to image..."),
        (Status::UploadingImage, "Uploading the image..."),
        (Status::PreparingData, "Preparing data..."),
        (Status::Analyzing, "Analyzing..."),
        (Status::Failed(Stage::StoreDocument), "Error: Failed to upload file"),
        (Status::Failed(Stage::DerivePreview), "Error: Failed to convert PDF to image"),
        (Status::Failed(Stage::StorePreview), "Error: Failed to upload image"),
        (Status::Failed(Stage::Evaluate), "Error: Failed to analyze resume"),
        (Status::Failed(Stage::ParseFeedback), "Error: Failed to parse analysis"),
    ];
    for (status, text) in expected {
        assert_eq!(status.to_string(), text);
    }
}

#[test]
fn only_complete_and_failed_are_terminal() {
    assert!(!Status::Analyzing.is_terminal());
    assert!(Status::Failed(Stage::Finalize).is_terminal());
    assert_eq!(Stage::ALL.len(), 7);
    assert_eq!(Stage::ALL[0], Stage::StoreDocument);
    assert_eq!(Stage::ALL[6], Stage::Finalize);
}
