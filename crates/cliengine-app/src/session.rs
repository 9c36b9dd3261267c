//! In-game session: the `>>` loop entered from the launcher's `run`.

use std::time::{SystemTime, UNIX_EPOCH};

use cliengine_profile::profile;
use cliengine_profile::{PlayerProfile, RecordStore};
use cliengine_terminal::{
    ArgumentSpec, Arguments, CommandRegistry, CommandSpec, EngineError, OverlapPolicy,
    RegistrationError, RegistryOptions, Result, ResultObject, ValueType,
};
use cliengine_types::config::Settings;

use crate::prompt::Prompt;
use crate::render::MESSAGE;
use crate::shell::{self, Console, LoopEnd};

/// Seconds since the Unix epoch.
pub fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// State of one play session.
pub struct Session<'a> {
    pub profile: PlayerProfile,
    store: &'a mut dyn RecordStore,
    prompt: &'a mut dyn Prompt,
}

impl<'a> Session<'a> {
    pub fn new(
        profile: PlayerProfile,
        store: &'a mut dyn RecordStore,
        prompt: &'a mut dyn Prompt,
    ) -> Self {
        Self {
            profile,
            store,
            prompt,
        }
    }

    /// Credit playtime and write the profile back.
    pub fn save(&mut self) -> Result<()> {
        self.profile.touch(now());
        profile::save(&mut *self.store, &self.profile)
    }
}

impl Console for Session<'_> {
    fn console(&mut self) -> &mut dyn Prompt {
        &mut *self.prompt
    }
}

/// Commands available inside a session.
pub fn registry<'a>(
    policy: OverlapPolicy,
) -> std::result::Result<CommandRegistry<Session<'a>>, RegistrationError> {
    let mut reg = CommandRegistry::with_options(RegistryOptions {
        overlap_policy: policy,
    });
    reg.register(CommandSpec::new("save", save).description("Save profile data."))?;
    reg.register(
        CommandSpec::new("status", status)
            .alias("stats")
            .arg(ArgumentSpec::optional("skill", ValueType::String))
            .description("Show the profile's progress, or the XP of one skill."),
    )?;
    reg.register(
        CommandSpec::new("xp", gain_xp)
            .arg(ArgumentSpec::required("amount", ValueType::Integer))
            .description("Award character experience."),
    )?;
    Ok(reg)
}

/// Play `profile` until `exit` or end of input, then save it.
pub fn play(
    profile: PlayerProfile,
    store: &mut dyn RecordStore,
    prompt: &mut dyn Prompt,
    settings: &Settings,
) -> Result<LoopEnd> {
    let registry = registry(settings.overlap_policy)?;
    let mut session = Session::new(profile, store, prompt);
    session.profile.resume(now());
    let id = session.profile.id.clone();
    session.prompt.say(&format!("Running game profile: {id}"));
    log::info!("session started for profile {id}");

    let end = shell::run(&registry, &mut session, &settings.session_prompt)?;

    session.save()?;
    session.prompt.say("Saved!");
    log::info!("session ended for profile {id} ({end:?})");
    Ok(end)
}

fn save(_args: &Arguments, session: &mut Session<'_>) -> Result<ResultObject> {
    match session.save() {
        Ok(()) => Ok(ResultObject::success().with(MESSAGE, "Saved!")),
        Err(e) => {
            log::warn!("saving profile {} failed: {e}", session.profile.id);
            Ok(ResultObject::failed().with(MESSAGE, format!("Failed to save: {e}")))
        },
    }
}

fn status(args: &Arguments, session: &mut Session<'_>) -> Result<ResultObject> {
    let p = &session.profile;
    if let Some(skill) = args.string("skill") {
        let xp = p.skill_xp.get(skill).copied().unwrap_or(0.0);
        return Ok(ResultObject::success()
            .with(MESSAGE, format!("{skill}: {xp}"))
            .with("skill_xp", xp));
    }
    let mut text = format!(
        "Profile: {} ({})\nMode: {}, difficulty: {}\nCharacter XP: {}",
        p.name, p.id, p.gamemode, p.difficulty, p.character_xp
    );
    for (skill, xp) in &p.skill_xp {
        text.push_str(&format!("\n  {skill}: {xp}"));
    }
    text.push_str(&format!(
        "\nQuests in progress: {}\nAchievements: {}\nItems: {}\nPlaytime: {}s",
        p.quest_stages.len(),
        p.achievements.values().filter(|&&unlocked| unlocked).count(),
        p.inventory.len(),
        p.total_playtime.floor()
    ));
    Ok(ResultObject::success().with(MESSAGE, text))
}

fn gain_xp(args: &Arguments, session: &mut Session<'_>) -> Result<ResultObject> {
    let amount = args
        .int("amount")
        .ok_or_else(|| EngineError::Handler("amount was not bound".to_string()))?;
    if amount <= 0 {
        return Ok(ResultObject::failed().with(MESSAGE, "XP amount must be positive."));
    }
    session.profile.character_xp += amount as f64;
    let total = session.profile.character_xp;
    Ok(ResultObject::success()
        .with(MESSAGE, format!("Gained {amount} XP ({total} total)."))
        .with("character_xp", total))
}
