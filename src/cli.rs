use crate::{
    config::Config,
    locate::{self, FormInput},
};
use anyhow::Result;
use clap::{crate_version, Arg, ArgMatches, Command};
use mylocations_core::entities::Category;
use mylocations_gateways::replay::Track;
use std::path::PathBuf;

fn command() -> Command {
    Command::new("mylocations")
        .version(crate_version!())
        .about("Find, resolve and tag your current location")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .help("Configuration file (default: mylocations.toml)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("locate")
                .about("Replay a recorded track until the location is good enough and tag it")
                .arg(
                    Arg::new("track")
                        .long("track")
                        .short('t')
                        .value_name("TRACK_FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true)
                        .help("TOML file with the recorded location updates"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("Description of the tagged location"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("NAME")
                        .help("Category of the tagged location (see 'categories')"),
                ),
        )
        .subcommand(
            Command::new("categories").about("List the categories a location can be tagged with"),
        )
}

pub async fn run() -> Result<()> {
    let matches = command().get_matches();
    match matches.subcommand() {
        Some(("locate", locate_matches)) => {
            let cfg =
                Config::try_load_from_file_or_default(locate_matches.get_one::<PathBuf>("config"))?;
            run_locate(&cfg, locate_matches).await
        }
        Some(("categories", _)) => {
            for category in Category::all() {
                println!("{}", category.name());
            }
            Ok(())
        }
        _ => {
            command().print_help()?;
            Ok(())
        }
    }
}

async fn run_locate(cfg: &Config, matches: &ArgMatches) -> Result<()> {
    let input = form_input(matches);
    let track_file = matches
        .get_one::<PathBuf>("track")
        .ok_or_else(|| anyhow::anyhow!("Missing track file"))?;
    let track = Track::load(track_file)?;
    match locate::locate(cfg, track, input).await? {
        Some(draft) => {
            log::info!("Tagged location at {}", draft.pos);
            println!("Tagged");
        }
        None => println!("No location could be tagged"),
    }
    Ok(())
}

fn form_input(matches: &ArgMatches) -> FormInput {
    FormInput {
        description: matches.get_one::<String>("description").cloned(),
        category: matches.get_one::<String>("category").cloned(),
    }
}
