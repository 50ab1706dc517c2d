use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use snake_wrap::audio::{AudioSink, Silent, TerminalBell};
use snake_wrap::config::Cli;
use snake_wrap::game::SnakeGame;
use snake_wrap::render::Image;
use snake_wrap::session::Session;
use snake_wrap::store::JsonScoreStore;
use snake_wrap::term::TermCanvas;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    if cli.mute {
        run(&cli, Silent)
    } else {
        run(&cli, TerminalBell::new())
    }
}

fn run<A: AudioSink>(cli: &Cli, audio: A) -> Result<()> {
    let board = cli.board()?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let image = cli.game_over_art.as_deref().and_then(|path| match Image::load(path) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("game-over art unavailable: {e:#}");
            None
        }
    });

    let canvas = TermCanvas::new(&board)?;
    let store = JsonScoreStore::new(&cli.best_score_file);
    let session = Session::new(board, rng, canvas, audio, store).with_game_over_image(image);

    let mut game = SnakeGame::new(session);

    // Put the terminal back before reporting whatever ended the game.
    let outcome = game.initialize().and_then(|()| {
        if game.show_intro()? {
            game.play()
        } else {
            Ok(())
        }
    });
    game.shutdown()?;
    outcome
}
