use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::path::PathBuf;
use themer::compile::Compiler;
use themer::config::{Config, ARTIFACT_SUFFIX, COMPILER_FLAGS, SOURCE_ENTRY};
use themer::discover;
use themer::plan::{self, Mode};
use themer::select::Selector;

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = App::new("themer")
        .about("Builds SASS themes into minified CSS assets and selects the active theme")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("project")
                .short("C")
                .long("project")
                .takes_value(true)
                .global(true)
                .help("Directory from which to search for `themer.yaml` (defaults to the current directory)"),
        )
        .subcommand(
            SubCommand::with_name("build")
                .about("Runs the SASS compiler on theme configurations found in the themes directory")
                .arg(
                    Arg::with_name("theme")
                        .long("theme")
                        .takes_value(true)
                        .conflicts_with_all(&["missing", "all"])
                        .help("Build only the named theme"),
                )
                .arg(
                    Arg::with_name("missing")
                        .long("missing")
                        .conflicts_with("all")
                        .help("Build only the themes that don't have a compiled stylesheet yet"),
                )
                .arg(
                    Arg::with_name("all")
                        .long("all")
                        .help("Build every detected theme, overwriting existing stylesheets"),
                ),
        )
        .subcommand(
            SubCommand::with_name("select")
                .about("Sets the active theme for the site")
                .arg(
                    Arg::with_name("theme")
                        .long("theme")
                        .takes_value(true)
                        .conflicts_with("random")
                        .help("The theme to activate; must have a compiled stylesheet"),
                )
                .arg(
                    Arg::with_name("random")
                        .long("random")
                        .help("Pick a random theme other than the current one"),
                ),
        )
        .subcommand(
            SubCommand::with_name("themes")
                .about("Lists detected themes, marking built and active ones"),
        )
        .get_matches();

    let start = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let config = Config::from_directory(&start)?;

    match matches.subcommand() {
        ("build", Some(matches)) => build(&config, matches),
        ("select", Some(matches)) => select(&config, matches),
        ("themes", _) => themes(&config),
        _ => unreachable!(), // SubcommandRequiredElseHelp
    }
}

fn build(config: &Config, matches: &ArgMatches) -> Result<()> {
    let mode = if matches.is_present("all") {
        Mode::All
    } else if matches.is_present("missing") {
        Mode::MissingOnly
    } else {
        match matches.value_of("theme") {
            Some(name) => Mode::Single(name.to_owned()),
            None => {
                return Err(anyhow!(
                    "Missing required argument `--theme`; provide a theme name or use `--missing` or `--all`"
                ))
            }
        }
    };

    let discovered = discover::themes(&config.themes_directory);
    let built = discover::built(&config.stylesheets_directory, ARTIFACT_SUFFIX);
    let plan = plan::plan(&discovered, &built, mode)?;
    println!(
        "Preparing to compile {} theme(s); {} already have a `{}` asset (use `--missing` to skip those next time).",
        plan.targets.len(),
        plan.already_built,
        ARTIFACT_SUFFIX
    );

    let compiler = Compiler {
        program: &config.compiler,
        flags: COMPILER_FLAGS,
        output_directory: &config.stylesheets_directory,
    };
    let summary = compiler.compile_all(&plan.build_targets(config))?;

    for name in &summary.built {
        println!(
            "Compiled stylesheet for theme `{}`; use the `select` command to activate it.",
            name
        );
    }
    for (name, failure) in &summary.failures {
        eprintln!("Skipped theme `{}`: {}", name, failure);
    }
    println!(
        "Finished: {} built, {} skipped.",
        summary.built.len(),
        summary.failures.len()
    );
    Ok(())
}

fn select(config: &Config, matches: &ArgMatches) -> Result<()> {
    let selector = Selector {
        stylesheets_directory: &config.stylesheets_directory,
        artifact_suffix: ARTIFACT_SUFFIX,
        state_file: &config.state_file,
    };
    let selection = selector.select(matches.value_of("theme"), matches.is_present("random"))?;
    println!(
        "Theme changed from `{}` to `{}`. Refresh your browser to see it; only ever change `{}` through this command.",
        selection.previous,
        selection.theme,
        config.state_file.display()
    );
    Ok(())
}

fn themes(config: &Config) -> Result<()> {
    let discovered = discover::themes(&config.themes_directory);
    let built = discover::built(&config.stylesheets_directory, ARTIFACT_SUFFIX);
    let selector = Selector {
        stylesheets_directory: &config.stylesheets_directory,
        artifact_suffix: ARTIFACT_SUFFIX,
        state_file: &config.state_file,
    };

    // Built themes whose source directory was removed still show up; they
    // remain selectable as long as their artifact exists.
    let names: Vec<&String> = discovered.union(&built).collect();
    if names.is_empty() {
        println!(
            "No themes found; each theme is a directory under `{}` containing a `{}` file.",
            config.themes_directory.display(),
            SOURCE_ENTRY
        );
        return Ok(());
    }
    for name in names {
        let mut markers = Vec::new();
        if built.contains(name) {
            markers.push("built");
        }
        if selector.is_active(name) {
            markers.push("active");
        }
        match markers.is_empty() {
            true => println!("{}", name),
            false => println!("{} ({})", name, markers.join(", ")),
        }
    }
    Ok(())
}
