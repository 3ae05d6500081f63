//! Retrieves information about the version of the engine from Git and the build
//! environment. The front-end prints it on startup so that a session can be
//! traced back to the exact build.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
