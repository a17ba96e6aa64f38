use crate::app::api;
use crate::app::config::ConfigSources;
use crate::domain::AppError;

pub fn run_validate(sources: ConfigSources) -> Result<(), AppError> {
    let outcome = api::validate(&sources)?;

    println!("✅ {} is valid", outcome.stack_name);
    println!("   image: {}", outcome.image);
    println!(
        "   {} resources, {} grants, {} outputs",
        outcome.resources, outcome.grants, outcome.outputs
    );
    println!("   fingerprint: {}", outcome.fingerprint);
    Ok(())
}
