//! Generate command - Go code from the definitions named in `rpcgen.yml`.

use anyhow::{Context as _, Result};
use clap::Args;
use rpcgen_schema::{Generator, Options, input, options::CONFIG_FILE, output::GO_GENERATOR, parse_all};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Generate command arguments (none; everything comes from `rpcgen.yml`).
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {}

/// Run the generate command in the current directory.
pub fn run(_args: GenerateArgs) -> i32 {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: unable to determine working directory: {}", e);
            return 1;
        }
    };
    match generate(&root) {
        Ok(path) => {
            eprintln!("Generated {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            1
        }
    }
}

/// Load `rpcgen.yml` from `root`, generate, and write the output file.
/// Returns the path written.
pub fn generate(root: &Path) -> Result<PathBuf> {
    let opts = Options::load(&root.join(CONFIG_FILE))?;
    let folder = root.join(&opts.folder);
    let defs = input::load_folder(&folder)?;
    tracing::debug!(definitions = defs.len(), folder = %folder.display(), "loaded definitions");

    let code = parse_all(&opts, &defs, &GO_GENERATOR)?;

    let out_path = root.join(opts.output_path(GO_GENERATOR.extension()));
    write_atomically(&out_path, &code)
        .with_context(|| format!("unable to write file {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), bytes = code.len(), "wrote generated code");
    Ok(out_path)
}

/// Write through a temporary file in the target directory, then rename, so
/// readers never observe a partially written file.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    // Temp files are created owner-only; generated sources are world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "folder: defs\noutputFolder: api\ngo:\n  package: api\n  fiberImport: github.com/gofiber/fiber/v2\n";

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), CONFIG).unwrap();
        std::fs::create_dir(dir.path().join("defs")).unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join("defs").join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn writes_to_folder_named_file() {
        let dir = project(&[("a.yml", "Models: { Foo: { x: int32 } }")]);
        let path = generate(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("api").join("api.go"));
        let code = std::fs::read_to_string(&path).unwrap();
        assert!(code.contains("type Foo struct {"));
    }

    #[test]
    fn failure_writes_nothing() {
        let dir = project(&[
            ("a.yml", "Models: { Foo: { x: int32 } }"),
            ("b.yml", "Models: { Foo: { y: int32 } }"),
        ]);
        let err = generate(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate model name: Foo"));
        assert!(!dir.path().join("api").exists());
    }

    #[test]
    fn missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains(CONFIG_FILE));
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("x.go");
        write_atomically(&path, "first").unwrap();
        write_atomically(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[cfg(unix)]
    #[test]
    fn generated_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project(&[("a.yml", "Models: { Foo: { x: int32 } }")]);
        let path = generate(dir.path()).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
