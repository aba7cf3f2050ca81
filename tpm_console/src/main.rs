use std::io::BufRead;
use std::path::{Path, PathBuf};

use eyre::Context;
use tpm_rs::{CommandSource, TpmApp, WorldHandle};

use crate::host::ConsoleHost;

mod config;
mod host;

pub static CONSOLE_SOURCE: &str = "console";
/// Permission level of the server console, the highest a source can have.
pub const CONSOLE_PERMISSION_LEVEL: u8 = 4;

fn main() -> eyre::Result<()> {
    let directory = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    tpm_rs::config::create_initial_config(&directory)?;
    let conf = tpm_rs::config::load_config(&directory)?;
    tpm_rs::init_logging(conf.log_level)?;

    config::create_initial_config(&directory)?;
    let console_conf = config::load_config(&directory).context("Failed to load console config")?;

    log::info!("Loaded config: {:#?}", conf);

    let world = WorldHandle::server(console_conf.world_name.clone());
    let host = ConsoleHost::new(&console_conf.actors);
    let mut app = TpmApp::new(directory.join(&console_conf.saves_directory), host, conf);

    println!("Commands: `<console|actor> tpm ...`, `suggest <console|actor> tpm ...`, `where <actor>`, `save`, `reload`, `quit`");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("quit" | "exit", _) => break,
            ("save", _) => {
                app.on_world_save(&world)?;
                println!("Saved the world");
            }
            ("reload", _) => reload_config(&directory, &mut app)?,
            ("where", name) => match app.host().describe(name.trim()) {
                Some(description) => println!("{description}"),
                None => println!("! No player was found"),
            },
            ("suggest", rest) => {
                let (who, command) = rest.split_once(' ').unwrap_or((rest, ""));
                if let Some(source) = command_source(app.host(), &world, who) {
                    println!("{}", app.suggest(&source, command).join(", "));
                }
            }
            (who, command) => match command_source(app.host(), &world, who) {
                Some(source) => app.run_command(&source, command)?,
                None => println!("! Unknown source `{who}`"),
            },
        }
    }

    app.on_world_unload(&world)?;

    Ok(())
}

fn command_source(host: &ConsoleHost, world: &WorldHandle, who: &str) -> Option<CommandSource> {
    if who == CONSOLE_SOURCE {
        return Some(CommandSource {
            actor: None,
            permission_level: CONSOLE_PERMISSION_LEVEL,
            world: world.clone(),
        });
    }

    let actor = tpm_rs::Host::resolve_actor(host, who)?;
    let permission_level = host.permission_level(who)?;

    Some(CommandSource {
        actor: Some(actor),
        permission_level,
        world: world.clone(),
    })
}

fn reload_config(directory: &Path, app: &mut TpmApp<ConsoleHost>) -> eyre::Result<()> {
    log::debug!("Reloading config");

    match tpm_rs::config::load_config(directory) {
        Ok(conf) => {
            tpm_rs::set_log_level(conf.log_level);
            log::debug!("New config loaded: {:#?}", conf);
            app.set_config(conf);
        }
        Err(e) => log::warn!("Failed to reload config, keeping the old one: {e:?}"),
    }

    Ok(())
}
