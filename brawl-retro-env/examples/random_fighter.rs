use anyhow::Result;
use brawl_core::{
    record::BufferedRecorder, util::eval_with_recorder, DefaultEvaluator, Env as _,
    Evaluator as _, Monitor,
};
use brawl_retro_env::{
    util::{RandomPolicy, ScriptedEmulator},
    FighterEnv, FighterEnvConfig, ObsMode,
};
use clap::Parser;

type Env = Monitor<FighterEnv<ScriptedEmulator>>;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Game identifier
    #[arg(long, default_value = "SamuraiShodown-Genesis")]
    game: String,

    /// Environment configuration in YAML, overrides --game
    #[arg(long)]
    config: Option<String>,

    /// Number of episodes
    #[arg(long, default_value_t = 3)]
    episodes: usize,

    /// Observe frames instead of frame differences
    #[arg(long, default_value_t = false)]
    frame: bool,

    /// Render at every step
    #[arg(long, default_value_t = false)]
    render: bool,
}

fn env_config(args: &Args) -> Result<FighterEnvConfig> {
    let config = match &args.config {
        Some(path) => FighterEnvConfig::load(path)?,
        None => FighterEnvConfig::default().game(args.game.clone()),
    };
    let obs_mode = match args.frame {
        true => ObsMode::Frame,
        false => ObsMode::FrameDelta,
    };
    Ok(config.obs_mode(obs_mode).render(args.render))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let args = Args::parse();
    let env_config = env_config(&args)?;
    let mut policy = RandomPolicy;

    // Per-step records of a random fighter
    let mut env = Env::build(&env_config, 0)?;
    let mut recorder = BufferedRecorder::new();
    let returns = eval_with_recorder(&mut env, &mut policy, args.episodes, &mut recorder)?;
    println!("{} steps, returns = {:?}", recorder.len(), returns);
    env.close()?;

    let mut evaluator = DefaultEvaluator::<Env>::new(&env_config, 0, args.episodes)?;
    let record = evaluator.evaluate(&mut policy)?;
    println!("Mean return: {}", record.get_scalar("Episode return")?);
    evaluator.close()
}
