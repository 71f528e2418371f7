fn main() {
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    match args.first().map(String::as_str) {
        Some("codegen") => codegen(),
        Some("check") => check(),
        _ => help(),
    }
}

/// Regenerate the reference PyDev tree into `target/java`.
fn codegen() {
    cargo("run --release -p asdlgen-cli -- tests/inputs/python.asdl -o target/java");
}

fn check() {
    for grammar in ["python", "minimal", "shapes"] {
        cargo(&format!(
            "run -p asdlgen-cli -- --check tests/inputs/{grammar}.asdl"
        ));
    }
}

fn help() {
    let s = "
usage: cargo x <command>

commands:
    codegen    generate the PyDev AST into target/java
    check      validate every grammar under tests/inputs
";
    eprint!("{s}");

    std::process::exit(1);
}

fn cargo(s: &str) {
    cmd(&format!("cargo {s}"))
}

fn cmd(cmd: impl AsRef<str>) {
    let cmd = cmd.as_ref();
    let mut parts = cmd.split_ascii_whitespace();
    let Some(cmd) = parts.next() else {
        return;
    };
    let args = parts;

    let status = std::process::Command::new(cmd)
        .args(args)
        .stdout(std::io::stdout())
        .stderr(std::io::stderr())
        .status();
    match status {
        Ok(status) if status.success() => {}
        Ok(_) => {
            eprintln!("command exited with non-zero exit code");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("failed to run `{cmd}`: {err}");
            std::process::exit(1);
        }
    }
}
