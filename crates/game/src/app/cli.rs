use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CliOptions {
    /// Lab directory override; otherwise `<root>/assets/lab`.
    pub(crate) assets_dir: Option<PathBuf>,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) script_path: PathBuf,
}

pub(crate) fn usage_text() -> String {
    [
        "usage: lower_depths [--assets <dir>] [--config <file>] <script.json>",
        "",
        "Runs the lab headlessly, feeding the actions of <script.json> frame by frame.",
        "",
        "options:",
        "  --assets <dir>   lab directory holding Lab.mashgraph and rooms/",
        "  --config <file>  gameplay config JSON (defaults apply when absent)",
        "  -h, --help       print this text",
    ]
    .join("\n")
}

/// `Ok(None)` means help was requested.
pub(crate) fn parse_args<I>(args: I) -> Result<Option<CliOptions>, String>
where
    I: IntoIterator<Item = String>,
{
    let args = args.into_iter().collect::<Vec<_>>();
    let mut assets_dir = None;
    let mut config_path = None;
    let mut script_path = None;
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(None),
            "--assets" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --assets".to_string())?;
                assets_dir = Some(PathBuf::from(value));
                index += 2;
            }
            "--config" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --config".to_string())?;
                config_path = Some(PathBuf::from(value));
                index += 2;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}'"));
            }
            positional => {
                if script_path.is_some() {
                    return Err(format!("unexpected argument '{positional}'"));
                }
                script_path = Some(PathBuf::from(positional));
                index += 1;
            }
        }
    }

    let script_path = script_path.ok_or_else(|| "missing input script path".to_string())?;
    Ok(Some(CliOptions {
        assets_dir,
        config_path,
        script_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_options_and_script() {
        let options = parse_args(args(&["--assets", "lab", "run.json", "--config", "c.json"]))
            .expect("valid args")
            .expect("not help");
        assert_eq!(options.assets_dir, Some(PathBuf::from("lab")));
        assert_eq!(options.config_path, Some(PathBuf::from("c.json")));
        assert_eq!(options.script_path, PathBuf::from("run.json"));
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse_args(args(&["run.json", "--help"])), Ok(None));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            parse_args(args(&[])),
            Err("missing input script path".to_string())
        );
        assert_eq!(
            parse_args(args(&["--assets"])),
            Err("missing value for --assets".to_string())
        );
        assert_eq!(
            parse_args(args(&["--fast", "run.json"])),
            Err("unknown option '--fast'".to_string())
        );
        assert_eq!(
            parse_args(args(&["a.json", "b.json"])),
            Err("unexpected argument 'b.json'".to_string())
        );
    }
}
