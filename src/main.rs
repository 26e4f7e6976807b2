//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally for a quick look in the browser.

use std::io;
use std::process::{Command, ExitCode, Stdio};

const ADDR: &str = "127.0.0.1";
const PORT: &str = "8000";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> io::Result<()> {
    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            return Err(io::Error::other(
                "wasm-pack finished with errors (https://rustwasm.github.io/wasm-pack/)",
            ));
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH; serving whatever is already in static/pkg");
        }
    }

    println!("Serving static/ at http://{ADDR}:{PORT} (Ctrl-C to stop)");
    let status = Command::new("python3")
        .args(["-m", "http.server", PORT, "--bind", ADDR, "--directory", "static"])
        .stdout(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("http server exited with {status}")))
    }
}
