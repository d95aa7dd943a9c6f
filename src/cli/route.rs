//! CLI route: run context and dispatch of parsed commands.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_generation, format_manifest_table, format_verify};
use crate::config::{BlockmapConfig, ConfigLoader};
use crate::error::ManifestError;
use crate::manifest::{equal, Manifest, ManifestOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a command: text to print and whether the process should succeed
#[derive(Debug)]
pub struct RunOutcome {
    pub output: String,
    pub success: bool,
}

impl RunOutcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: resolved root and loaded configuration.
pub struct RunContext {
    root: PathBuf,
    config: BlockmapConfig,
}

impl RunContext {
    /// Resolve the root and load configuration (explicit file, else `<root>/.blockmap.toml`).
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ManifestError> {
        let root = dunce::canonicalize(&root).map_err(|source| ManifestError::Io {
            op: "Open",
            path: root.clone(),
            source,
        })?;
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&root)?,
        };
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BlockmapConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<RunOutcome, ManifestError> {
        match command {
            Commands::Generate {
                name,
                ignore,
                auto_ignore,
                no_save,
            } => self.generate(name.as_deref(), ignore, *auto_ignore, *no_save),
            Commands::Verify { name } => self.verify(name.as_deref()),
            Commands::Show { name } => self.show(name.as_deref()),
        }
    }

    /// Configured options, with `name` reserved so its own save is not hashed
    fn options(&self, name: Option<&str>) -> ManifestOptions {
        let mut options = self.config.manifest.to_options();
        if let Some(name) = name {
            if !options.saved_names.iter().any(|n| n == name) {
                options.saved_names.push(name.to_string());
            }
        }
        options
    }

    fn generate(
        &self,
        name: Option<&str>,
        ignore: &[String],
        auto_ignore: bool,
        no_save: bool,
    ) -> Result<RunOutcome, ManifestError> {
        let mut manifest = Manifest::with_options(&self.root, self.options(name));
        for path in ignore {
            manifest.add_ignore_path(path);
        }
        if auto_ignore {
            manifest.set_auto_ignore(true);
        }

        let generation = manifest.generate()?;
        if let Some(warning) = generation.warning() {
            warn!("{}", warning);
        }

        let saved_to = if no_save {
            None
        } else {
            Some(manifest.save(&self.root, name)?)
        };
        Ok(RunOutcome::ok(format_generation(
            &generation,
            saved_to.as_deref(),
        )))
    }

    fn verify(&self, name: Option<&str>) -> Result<RunOutcome, ManifestError> {
        let saved = Manifest::open(&self.root, name, self.options(name))?;
        saved.verify()?;

        // Regenerate with the saved policy so previously auto-ignored paths stay excluded
        let mut current = Manifest::with_options(&self.root, saved.options());
        let generation = current.generate()?;

        let unchanged = equal(&saved, &current);
        info!(unchanged, "Verification completed");
        Ok(RunOutcome {
            output: format_verify(&saved, &generation, unchanged),
            success: unchanged,
        })
    }

    fn show(&self, name: Option<&str>) -> Result<RunOutcome, ManifestError> {
        let saved = Manifest::open(&self.root, name, self.options(name))?;
        Ok(RunOutcome::ok(format_manifest_table(&saved)))
    }
}
