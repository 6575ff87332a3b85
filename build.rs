use std::error::Error;
use vergen_gitcl::{Emitter, GitclBuilder};

/// Emits the git describe string used in the version.
/// # Errors
/// * if `git` is not installed
/// * if there is no .git folder, such as when building from a source archive
fn emit_git() -> Result<(), Box<dyn Error>> {
    let gitcl = GitclBuilder::default()
        .describe(false, true, Some("NoTagShouldMatchThisPattern"))
        .build()?;

    Emitter::default()
        .fail_on_error()
        .add_instructions(&gitcl)?
        .emit()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    if emit_git().is_err() {
        // source archives have no git metadata; allow an override and fall back to "unknown"
        let git_desc = option_env!("HAPLOSYNC_GIT_DESCRIBE")
            .unwrap_or("unknown");
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE={git_desc}");
    }

    // vergen only tracks git state, so the manifest and sources are tracked here
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=HAPLOSYNC_GIT_DESCRIBE");

    Ok(())
}
