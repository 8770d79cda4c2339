pub mod config;
pub mod import;
pub mod matches;
pub mod squad;

use anyhow::Result;
use chills_core::{ChillsConfig, Discovery, Matcher, Roster, SortOrder};

use crate::PoolArgs;

/// The current user and a discovery session over their matches.
pub struct Session {
    pub user_id: String,
    pub discovery: Discovery,
}

/// Load the roster, match everyone against the current user and open a
/// discovery session over the result.
pub fn load_session(
    config: &ChillsConfig,
    pool: &PoolArgs,
    sort: Option<SortOrder>,
) -> Result<Session> {
    let Some(path) = pool.roster.clone().or_else(|| config.roster_path()) else {
        anyhow::bail!(
            "No roster given.\n\n\
            Pass one with:\n  \
            chills match --roster <file>\n\n\
            or set `roster` in {}",
            ChillsConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    };

    let roster = Roster::load(&path)?;
    let normalizer = config.normalizer()?;
    let (me, candidates) = roster.profiles(&normalizer);

    if me.skipped() > 0 {
        tracing::warn!(
            skipped = me.skipped(),
            "some of your enrolments could not be read"
        );
    }

    let matcher = pool.scope.map(Matcher::new).unwrap_or_else(|| config.matcher());
    let matches = matcher.match_all(&me, &candidates);

    Ok(Session {
        user_id: me.user_id().to_string(),
        discovery: Discovery::new(matches, sort.unwrap_or(config.default_sort)),
    })
}
