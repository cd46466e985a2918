//! Zone combat simulator
//!
//! Runs one seeded fight from catalog files and prints the transcript.

use anyhow::{anyhow, Context};
use clap::Parser;

use zone_core::{simulate_combat, simulate_pvp_combat, Duelist, MutantProfile, PlayerSnapshot, WeaponProfile};
use zone_rules::{Catalog, GameConfig, Player, RandomSource, SeededRandom};

/// Simulate a fight in the Zone
#[derive(Parser, Debug)]
#[command(name = "zone-sim")]
#[command(author, version, about = "Zone combat simulator", long_about = None)]
struct Args {
    /// Catalog JSON with items, mutants, zones and artifacts
    #[arg(long = "catalog")]
    catalog: String,

    /// Game config TOML (defaults when omitted)
    #[arg(long = "config")]
    config: Option<String>,

    /// Mutant id to fight
    #[arg(long = "mutant", required_unless_present = "pvp_opponent_weapon")]
    mutant: Option<String>,

    /// Weapon item id (bare hands when omitted)
    #[arg(long = "weapon")]
    weapon: Option<String>,

    /// Armor item id
    #[arg(long = "armor")]
    armor: Option<String>,

    /// Random seed (entropy when omitted)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Run a duel against a stalker carrying this weapon instead
    #[arg(long = "pvp-opponent-weapon")]
    pvp_opponent_weapon: Option<String>,

    /// Print the structured event log as JSON
    #[arg(long = "json")]
    json: bool,
}

fn weapon(catalog: &Catalog, id: Option<&str>) -> anyhow::Result<Option<WeaponProfile>> {
    id.map(|id| WeaponProfile::lookup(catalog, &id.into()))
        .transpose()
        .map_err(|rejection| anyhow!("{rejection}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let catalog = Catalog::load(&args.catalog).with_context(|| format!("loading catalog {}", args.catalog))?;
    let config = match &args.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => SeededRandom::new(seed),
        None => SeededRandom::from_entropy(),
    };
    tracing::info!(seed = rng.seed(), "simulation starting");

    let mut player = Player::new("sim", "Stalker", &config);
    player.equipped.weapon = args.weapon.as_deref().map(Into::into);
    player.equipped.armor = args.armor.as_deref().map(Into::into);
    let player_weapon = weapon(&catalog, args.weapon.as_deref())?;

    let rng: &mut dyn RandomSource = &mut rng;
    let (transcript, events, summary) = if let Some(opponent_weapon) = &args.pvp_opponent_weapon {
        let opponent_weapon = weapon(&catalog, Some(opponent_weapon.as_str()))?;
        let mut challenger = Duelist::from_player(&player, &catalog);
        let mut target = Duelist::new("Rival", config.starting_health);
        let result = simulate_pvp_combat(
            &mut challenger,
            &mut target,
            player_weapon.as_ref(),
            opponent_weapon.as_ref(),
            rng,
        );
        let summary = format!(
            "{} after {} rounds ({:?}); health {} vs {}",
            if result.victory { "Won" } else { "Lost" },
            result.rounds,
            result.decision,
            challenger.health,
            target.health
        );
        (result.transcript, result.events, summary)
    } else {
        let mutant_id = args.mutant.as_deref().context("--mutant is required")?;
        let def = catalog
            .mutant(mutant_id)
            .ok_or_else(|| anyhow!("no mutant {mutant_id} in {}", args.catalog))?;
        let snapshot = PlayerSnapshot::capture(&player, &catalog, &config);
        let result = simulate_combat(&snapshot, &MutantProfile::from_def(def, &catalog), player_weapon.as_ref(), rng);
        let summary = format!(
            "{} after {} rounds; dealt {}, took {}, +{} radiation, {} loot, {} rubles",
            if result.victory { "Victory" } else { "Defeat" },
            result.rounds,
            result.damage_dealt,
            result.damage_taken,
            result.radiation_gained,
            result.loot.len(),
            result.ruble_reward
        );
        (result.transcript, result.events, summary)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        for line in &transcript {
            println!("{line}");
        }
    }
    println!("{summary}");
    Ok(())
}
