use anyhow::Result;
use rusty_sales::walkthrough::{self, WalkthroughConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = WalkthroughConfig::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    walkthrough::run(&config, &mut out)?;
    Ok(())
}
