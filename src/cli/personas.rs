use crate::cli::PersonasArgs;
use crate::config::Config;

pub fn execute(args: PersonasArgs) -> anyhow::Result<()> {
    let config = Config::load_or_default(&args.config)?;

    for set in config.persona_sets() {
        let marker = if set.id == config.persona_set {
            " (active)"
        } else {
            ""
        };
        println!("{} [{}]{}", set.name, set.id, marker);

        for persona in &set.personas {
            let state = if persona.enabled { "" } else { " (disabled)" };
            println!("  - {} [{}]{}", persona.name, persona.id, state);
        }
        println!();
    }

    Ok(())
}
