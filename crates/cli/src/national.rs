//! `quantiv national`: the national mean override.

use clap::Subcommand;
use quantiv_core::NationalOverride;

use crate::util::{fmt_num, print_json};
use crate::{CliError, Context};

#[derive(Subcommand)]
pub enum NationalCommands {
    /// Print the current override
    Show,

    /// Replace the population mean in national comparisons
    #[command(after_help = "\
Examples:
  quantiv national set 11.5
  quantiv national set 11,5")]
    Set { value: String },

    /// Go back to the computed population mean
    Clear,
}

pub fn cmd_national(ctx: &Context, cmd: NationalCommands) -> Result<(), CliError> {
    match cmd {
        NationalCommands::Show => {
            let national = ctx.store.load_national_override();
            if ctx.json {
                return print_json(&national);
            }
            match national.mean {
                Some(mean) => println!("national mean: {}", fmt_num(mean, ctx.precision())),
                None => println!("national mean: computed"),
            }
            Ok(())
        }
        NationalCommands::Set { value } => {
            let national = NationalOverride::parse(&value)?;
            ctx.store.save_national_override(&national)?;
            match national.mean {
                Some(mean) => eprintln!("national mean set to {}", mean),
                None => eprintln!("national override cleared"),
            }
            Ok(())
        }
        NationalCommands::Clear => {
            ctx.store.save_national_override(&NationalOverride::default())?;
            eprintln!("national override cleared");
            Ok(())
        }
    }
}
