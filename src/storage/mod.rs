//! Storage module for profile and session files.

pub mod profile;
pub mod session_file;

pub use profile::{
    default_profile_path, load_profile, save_profile, AthleteProfile, ProfileError,
};
pub use session_file::{load_session, save_session, SessionFileError};
