//! fieldgen's main application entry point.
//! Resolves options and collaborators, then hands over to the generator.

use std::io::IsTerminal;

use fieldgen::{
    cli::get_options,
    db::Database,
    error::{default_error_handler, Result},
    generator::Generator,
    locator::locate_root,
    options::Options,
    prompt::{DialoguerPrompter, LinePrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let set = get_options();
    let options = match Options::try_from(&set) {
        Ok(options) => options,
        Err(err) => {
            default_error_handler(err);
            return;
        }
    };

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if options.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(options) {
        default_error_handler(err);
    }
}

/// Wires the terminal and database to a [`Generator`] and runs it.
fn run(options: Options) -> Result<()> {
    let mut prompt: Box<dyn Prompter> = if std::io::stdin().is_terminal() {
        Box::new(DialoguerPrompter::new())
    } else {
        Box::new(LinePrompter::new(std::io::stdin().lock(), std::io::stdout()))
    };

    let drupal_root = locate_root(options.drupal_root.as_deref());
    let mut database = Database::open(drupal_root.as_deref())?;

    Generator::new(&options, &mut *prompt, &mut database).run()?;
    Ok(())
}
