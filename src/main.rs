// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for cross09.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use serde_json::json;

use cross09::assembler::cli::{Cli, DiagnosticsFormat};
use cross09::assembler::output::{remove_partial, write_image, write_listing};
use cross09::assembler::{Assembler, Assembly};
use cross09::core::assembler::error::{Diagnostic, FatalError, Severity};
use cross09::core::source::FsSourceProvider;
use cross09::registry_defaults::build_default_registry;

fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn format_diagnostic_line(diag: &Diagnostic, format: DiagnosticsFormat) -> String {
    match format {
        DiagnosticsFormat::Json => json!({
            "code": diag.code_str(),
            "severity": severity_to_str(diag.severity()),
            "message": diag.message(),
            "file": diag.file(),
            "line": diag.line(),
            "source": diag.source(),
        })
        .to_string(),
        DiagnosticsFormat::Text => diag.format_with_context(),
    }
}

fn format_fatal(err: &FatalError, format: DiagnosticsFormat) -> String {
    match format {
        DiagnosticsFormat::Json => json!({
            "code": "fatal",
            "severity": "fatal",
            "message": err.to_string(),
            "file": null,
            "line": null,
            "source": null,
        })
        .to_string(),
        DiagnosticsFormat::Text => format!("FATAL: {err}"),
    }
}

/// Write the object file (only for a clean run) and the listing.
fn write_outputs(cli: &Cli, assembly: &Assembly) -> Result<(), FatalError> {
    if assembly.error_count() == 0 {
        write_image(&cli.output_path(), assembly, cli.format)?;
    } else {
        info!("not writing object file: {} errors", assembly.error_count());
        remove_partial(&cli.output_path());
    }
    if let Some(path) = &cli.list {
        write_listing(path, assembly, cli.symbols)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<Assembly, FatalError> {
    let registry = build_default_registry();
    let options = cli.asm_options(&registry)?;
    let assembler = Assembler::new(options, FsSourceProvider::new(cli.include_dirs.clone()));
    let assembly = assembler.assemble_file(&cli.input)?;
    for diag in &assembly.diagnostics {
        eprintln!("{}", format_diagnostic_line(diag, cli.diagnostics));
    }
    write_outputs(cli, &assembly)?;
    Ok(assembly)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .init();
    match run(&cli) {
        Ok(assembly) => {
            info!(
                "{}: {} errors, {} warnings",
                cli.input.display(),
                assembly.error_count(),
                assembly.warning_count()
            );
            if assembly.error_count() > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            error!("{err}");
            eprintln!("{}", format_fatal(&err, cli.diagnostics));
            remove_partial(&cli.output_path());
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cross09::core::assembler::error::ErrorFlags;

    #[test]
    fn json_diagnostics_have_expected_keys() {
        let diag = Diagnostic::from_error(7, ErrorFlags::UNDEFINED, Some("FOO"))
            .with_file(Some("prog.asm".to_string()));
        let line = format_diagnostic_line(&diag, DiagnosticsFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["code"], "E003");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["line"], 7);
        assert_eq!(value["file"], "prog.asm");
        assert!(value["message"].as_str().unwrap_or_default().contains("FOO"));
        assert!(value["source"].is_null());
    }

    #[test]
    fn fatal_errors_render_as_json() {
        let err = FatalError::UnknownCpu("z80".to_string());
        let value: serde_json::Value =
            serde_json::from_str(&format_fatal(&err, DiagnosticsFormat::Json)).expect("json");
        assert_eq!(value["severity"], "fatal");
        assert!(value["line"].is_null());
    }
}
