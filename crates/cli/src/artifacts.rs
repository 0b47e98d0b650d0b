//! Locates the artifacts to scan under an exploded web application.

use crate::ScanArgs;
use std::path::PathBuf;
use tracing::debug;

/// Jars in `WEB-INF/lib` (sorted), then class directories, then explicit artifacts.
pub fn collect(args: &ScanArgs) -> std::io::Result<Vec<PathBuf>> {
    let web_inf = args.webapp().join("WEB-INF");
    let mut artifacts = Vec::new();

    let lib = web_inf.join("lib");
    if lib.is_dir() {
        let mut jars: Vec<PathBuf> = std::fs::read_dir(&lib)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("jar"))
            })
            .collect();
        jars.sort();
        artifacts.extend(jars);
    }

    if args.classes.is_empty() {
        let classes = web_inf.join("classes");
        if classes.is_dir() {
            artifacts.push(classes);
        }
    } else {
        artifacts.extend(args.classes.iter().cloned());
    }

    artifacts.extend(args.artifacts.iter().cloned());
    debug!("Artifacts to scan: {:?}", artifacts);
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_lib_jars_then_classes_then_extras() {
        let dir = tempfile::tempdir().unwrap();
        let web_inf = dir.path().join("WEB-INF");
        fs::create_dir_all(web_inf.join("lib")).unwrap();
        fs::create_dir_all(web_inf.join("classes")).unwrap();
        fs::write(web_inf.join("lib/b.jar"), b"").unwrap();
        fs::write(web_inf.join("lib/a.JAR"), b"").unwrap();
        fs::write(web_inf.join("lib/readme.txt"), b"").unwrap();

        let args = ScanArgs {
            webapp: dir.path().to_path_buf(),
            artifacts: vec![PathBuf::from("extra.jar")],
            ..ScanArgs::default()
        };
        let artifacts = collect(&args).unwrap();
        assert_eq!(
            artifacts,
            vec![
                web_inf.join("lib/a.JAR"),
                web_inf.join("lib/b.jar"),
                web_inf.join("classes"),
                PathBuf::from("extra.jar"),
            ]
        );
    }

    #[test]
    fn test_explicit_classes_replace_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("WEB-INF/classes")).unwrap();
        let args = ScanArgs {
            webapp: dir.path().to_path_buf(),
            classes: vec![PathBuf::from("target/classes")],
            ..ScanArgs::default()
        };
        assert_eq!(collect(&args).unwrap(), vec![PathBuf::from("target/classes")]);
    }
}
