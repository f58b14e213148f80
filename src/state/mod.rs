/// State management module
///
/// This module holds all application state, including:
/// - Design placement coordinates (transform.rs)
/// - Mockup generation options (options.rs)
/// - The generate / place / apply workflow (session.rs)

pub mod transform;
pub mod options;
pub mod session;
