//! Build command implementations (build and the single-step commands)

use std::path::PathBuf;
use std::process::ExitCode;

use crate::build::{
    BuildContext, ConsoleProgress, Generator, JsonProgress, ProgressReporter, Step, StepResult,
    StepSelection,
};
use crate::config::{apply_overrides, default_config, find_config, load_config, CliOverrides};

use super::{BuildArgs, GlobalOptions, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Load the configuration, apply command-line overrides and build the context.
///
/// Config file errors exit with `EXIT_ERROR`; overrides that produce an
/// invalid config exit with `EXIT_INVALID_ARGS`.
fn load_context(global: &GlobalOptions, overrides: CliOverrides) -> Result<BuildContext, ExitCode> {
    let config_path = global.config.clone().or_else(find_config);

    let (config, project_root) = match config_path {
        Some(path) => {
            log::debug!("Using config: {}", path.display());
            let config = match load_config(Some(&path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return Err(ExitCode::from(EXIT_ERROR));
                }
            };
            let root = path.parent().map(|p| p.to_path_buf()).unwrap_or_else(current_dir);
            (config, root)
        }
        None => {
            log::debug!("No dexsprite.toml found, using defaults");
            (default_config(), current_dir())
        }
    };

    let overrides = CliOverrides {
        sprites: global.sprites.clone(),
        out: global.out.clone(),
        resources: global.resources.clone(),
        ..overrides
    };
    let config = match apply_overrides(config, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_INVALID_ARGS));
        }
    };

    Ok(BuildContext::new(config, project_root).with_verbose(global.verbose))
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

fn create_generator(context: BuildContext) -> Result<Generator, ExitCode> {
    Generator::new(context).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Run the full build
pub fn run_build(global: &GlobalOptions, args: &BuildArgs) -> ExitCode {
    let overrides = CliOverrides {
        jobs: args.jobs,
        mirror: args.no_mirror.then_some(false),
        shiny_icons: args.shiny_icons.then_some(true),
        icon_size: args.icon_size,
        ..Default::default()
    };
    let context = match load_context(global, overrides) {
        Ok(context) => context,
        Err(code) => return code,
    };
    let generator = match create_generator(context) {
        Ok(generator) => generator,
        Err(code) => return code,
    };

    let selection = StepSelection {
        front: !args.skip_front,
        back: !args.skip_back,
        overworld: !args.skip_overworld,
        icons: !args.skip_icons,
    };

    let reporter: Box<dyn ProgressReporter> = if args.json {
        Box::new(JsonProgress::with_output(std::io::stdout()))
    } else {
        Box::new(ConsoleProgress::new().with_verbose(global.verbose))
    };

    match generator.run(&selection, reporter.as_ref()) {
        Ok(result) if result.is_success() => ExitCode::from(EXIT_SUCCESS),
        Ok(result) => {
            if !args.json {
                eprintln!("{}", result.summary());
            }
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run one generation step without clearing the output tree
pub fn run_single(global: &GlobalOptions, step: Step, overrides: CliOverrides) -> ExitCode {
    let context = match load_context(global, overrides) {
        Ok(context) => context,
        Err(code) => return code,
    };
    let generator = match create_generator(context) {
        Ok(generator) => generator,
        Err(code) => return code,
    };

    let reporter = ConsoleProgress::new().with_verbose(global.verbose);
    let context = generator.context();
    let result: Result<StepResult, _> = match step {
        Step::Front => generator.generate_front(&reporter),
        Step::Back => generator.generate_back(&reporter),
        Step::Overworld => generator.generate_overworld(context.mirror(), &reporter),
        Step::Icons => generator.generate_icons(context.shiny_icons(), &reporter),
    };

    match result {
        Ok(result) if result.is_success() => ExitCode::from(EXIT_SUCCESS),
        Ok(result) => {
            for target in result.failures() {
                eprintln!("  - {}: {}", target.species, target.status);
            }
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            eprintln!("Error in {} step: {}", step, e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global_for(root: &std::path::Path) -> GlobalOptions {
        GlobalOptions {
            config: Some(root.join("dexsprite.toml")),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_context_uses_config_dir_as_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dexsprite.toml"), "[project]\nout = \"dist\"\n").unwrap();

        let context = load_context(&global_for(temp.path()), CliOverrides::default()).unwrap();
        assert_eq!(context.out_dir(), temp.path().join("dist"));
        assert_eq!(context.sprites_dir(), temp.path().join("sprites"));
    }

    #[test]
    fn test_load_context_global_overrides() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dexsprite.toml"), "").unwrap();
        let global = GlobalOptions {
            sprites: Some(PathBuf::from("raw")),
            verbose: true,
            ..global_for(temp.path())
        };

        let context = load_context(&global, CliOverrides::default()).unwrap();
        assert_eq!(context.sprites_dir(), temp.path().join("raw"));
        assert!(context.is_verbose());
    }

    #[test]
    fn test_load_context_invalid_override() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dexsprite.toml"), "").unwrap();
        let overrides = CliOverrides { jobs: Some(0), ..Default::default() };

        assert!(load_context(&global_for(temp.path()), overrides).is_err());
    }

    #[test]
    fn test_load_context_bad_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dexsprite.toml"), "[build]\njobs = \"many\"\n").unwrap();

        assert!(load_context(&global_for(temp.path()), CliOverrides::default()).is_err());
    }
}
