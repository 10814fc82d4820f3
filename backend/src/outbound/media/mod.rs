//! Image hosting adapters.

mod cloudinary;

pub use cloudinary::{
    CloudinaryConfigError, CloudinaryCredentials, CloudinaryMediaStore, POST_IMAGE_FOLDER,
};
