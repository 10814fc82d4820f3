//! Port for the image-hosting provider.

use async_trait::async_trait;

use crate::domain::ImageDataUrl;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The provider refused the image (size, format, credentials).
        Rejected { message: String } => "media store rejected the request: {message}",
        /// The provider could not be reached or failed internally.
        Unavailable { message: String } => "media store unavailable: {message}",
    }
}

/// Publicly reachable location of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Public URL of the image.
    pub url: String,
}

/// Outbound port for hosted post images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload an image, returning its public URL.
    async fn upload(&self, image: &ImageDataUrl) -> Result<StoredImage, MediaStoreError>;

    /// Delete a previously uploaded image by its public URL.
    async fn delete(&self, url: &str) -> Result<(), MediaStoreError>;
}

/// Media store used when no provider is configured. Uploads fail, so
/// text-only posts keep working while image posts report an upload error.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMediaStore;

#[async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, _image: &ImageDataUrl) -> Result<StoredImage, MediaStoreError> {
        Err(MediaStoreError::unavailable("image uploads are not configured"))
    }

    async fn delete(&self, _url: &str) -> Result<(), MediaStoreError> {
        Err(MediaStoreError::unavailable("image uploads are not configured"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn disabled_store_refuses_uploads() {
        let image = ImageDataUrl::parse("data:image/gif;base64,R0lGODlhAQABAAAAACw=")
            .expect("valid image");
        let err = DisabledMediaStore
            .upload(&image)
            .await
            .expect_err("uploads are disabled");
        assert!(matches!(err, MediaStoreError::Unavailable { .. }));
    }
}
