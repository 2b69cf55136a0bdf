use std::path::PathBuf;

use bindery_compiler::{Config, Generator};

use super::model_loader::load_model_or_exit;

pub struct CheckArgs {
    pub model_path: PathBuf,
}

pub fn run(args: CheckArgs) {
    let model = load_model_or_exit(&args.model_path);

    // Emission and rendering cannot fail once analysis passes, so planning is skipped.
    if let Err(e) = Generator::new(Config::new()).analyze(&model) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
