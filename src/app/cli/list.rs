use crate::app::api;
use crate::app::config::ConfigSources;
use crate::domain::AppError;

pub fn run_list(sources: ConfigSources) -> Result<(), AppError> {
    let entries = api::list(&sources)?;

    for (i, entry) in entries.iter().enumerate() {
        if entry.depends_on.is_empty() {
            println!("  {}. {} ({})", i + 1, entry.id, entry.kind);
        } else {
            println!(
                "  {}. {} ({}) <- {}",
                i + 1,
                entry.id,
                entry.kind,
                entry.depends_on.join(", ")
            );
        }
    }
    Ok(())
}
