//! `atp clear` command - Reset the project to a single blank room

use console::style;
use miette::Result;

use crate::cli::helpers::{prompt_line, Session};
use crate::cli::GlobalOpts;
use crate::core::{DestroyTarget, CLEAR_ALL_PHRASE};

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Confirmation phrase, for scripted use (must be "CLEAR ALL DATA")
    #[arg(long)]
    pub confirm: Option<String>,
}

pub fn run(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let token = session.state.request_destroy(DestroyTarget::AllData)?;

    let input = match args.confirm {
        Some(phrase) => phrase,
        None => {
            println!(
                "{} This permanently deletes every room, checklist and equipment list.",
                style("!").red().bold()
            );
            prompt_line(&format!(
                "To confirm, please type \"{}\": ",
                CLEAR_ALL_PHRASE
            ))?
        }
    };

    session.state.confirm_destroy(token, &input)?;
    if !global.quiet {
        println!("{} All data cleared", style("✓").green());
    }
    Ok(())
}
