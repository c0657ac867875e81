//! Built-in action sources. In training the actions come from a learned
//! model; these stand in for it when replaying or benchmarking episodes.

pub mod scripted;
pub mod strategist;

use crate::counter::AgentState;
use crate::intent::ActionRequest;
use crate::world::ArenaSnapshot;

pub trait Policy: Send {
    fn id(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn reset(&mut self, seed: u32);
    fn next_action(&mut self, world: &ArenaSnapshot, state: AgentState) -> ActionRequest;
}

pub fn bot_ids() -> Vec<&'static str> {
    describe_bots().into_iter().map(|(id, _)| id).collect()
}

pub fn describe_bots() -> Vec<(&'static str, &'static str)> {
    vec![
        (strategist::ID, strategist::DESCRIPTION),
        (scripted::FORAGER_ID, scripted::FORAGER_DESCRIPTION),
        (scripted::GUARDIAN_ID, scripted::GUARDIAN_DESCRIPTION),
        (scripted::IDLE_ID, scripted::IDLE_DESCRIPTION),
        (scripted::RANDOM_ID, scripted::RANDOM_DESCRIPTION),
    ]
}

pub fn create_bot(id: &str) -> Option<Box<dyn Policy>> {
    match id {
        strategist::ID => Some(Box::new(strategist::StrategistBot::default())),
        scripted::FORAGER_ID => Some(Box::new(scripted::ForagerBot)),
        scripted::GUARDIAN_ID => Some(Box::new(scripted::GuardianBot)),
        scripted::IDLE_ID => Some(Box::new(scripted::IdleBot)),
        scripted::RANDOM_ID => Some(Box::new(scripted::RandomBot::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_bot_can_be_created() {
        for id in bot_ids() {
            let bot = create_bot(id).unwrap_or_else(|| panic!("missing bot {id}"));
            assert_eq!(bot.id(), id);
        }
        assert!(create_bot("nope").is_none());
    }
}
