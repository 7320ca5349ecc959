//! Opening deep links from a terminal.

use std::process::{Command, Stdio};

use hof_commerce::checkout::{LaunchError, Launcher};
use tracing::{debug, info};

use crate::output::Output;

/// Opens links with the desktop's URL handler.
///
/// There is no page to replace in a terminal, so in-place navigation
/// prints the link for the user to follow.
pub struct SystemLauncher {
    output: Output,
    enabled: bool,
}

impl SystemLauncher {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            enabled: true,
        }
    }

    /// Never spawn an opener; every link goes through the printed fallback.
    pub fn print_only(output: Output) -> Self {
        Self {
            output,
            enabled: false,
        }
    }
}

fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

impl Launcher for SystemLauncher {
    fn open_new_context(&self, url: &str) -> Result<(), LaunchError> {
        if !self.enabled {
            return Err(LaunchError::Blocked);
        }

        let (program, args) = opener();
        debug!(program, "Opening link");
        let status = Command::new(program)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| LaunchError::Unavailable(format!("{program}: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::Unavailable(format!("{program} exited with {status}")))
        }
    }

    fn navigate_in_place(&self, url: &str) {
        info!("Printing link for manual opening");
        self.output.info("Abra o link abaixo para enviar o pedido:");
        if self.output.is_json() {
            return;
        }
        println!("{}", url);
    }
}
