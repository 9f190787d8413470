use crate::model::QUOTES;
use crate::pet::{Event, Pet};
use crate::schedule::Millis;
use log::debug;
use rand::seq::SliceRandom;

pub(crate) const MESSAGE_MS: Millis = 4000;

impl Pet {
    /// Shows `text`, or a random quote when None. The bubble clears itself
    /// after four seconds; a newer utterance restarts that countdown.
    pub(crate) fn speak(&mut self, text: Option<&str>) {
        let msg = match text {
            Some(t) => t,
            None => QUOTES.choose(&mut self.rng).copied().unwrap_or_default(),
        };
        debug!("say {:?}", msg);
        self.state.message = msg.to_string();
        self.sched.cancel_slot(&mut self.timers.message);
        self.timers.message = Some(self.sched.after(MESSAGE_MS, Event::ClearMessage));
    }
}

#[cfg(test)]
mod tests {
    use crate::model::QUOTES;
    use crate::pet::tests::quiet_pet;

    #[test]
    fn fixed_text_shows_then_clears() {
        let mut pet = quiet_pet(1);
        pet.speak(Some("hello"));
        assert_eq!(pet.state.message, "hello");
        pet.advance(3999);
        assert_eq!(pet.state.message, "hello");
        pet.advance(1);
        assert!(pet.state.message.is_empty());
    }

    #[test]
    fn random_quote_comes_from_catalog() {
        let mut pet = quiet_pet(2);
        for _ in 0..50 {
            pet.speak(None);
            assert!(QUOTES.contains(&pet.state.message.as_str()));
        }
    }

    #[test]
    fn newer_message_is_not_blanked_by_older_clear() {
        let mut pet = quiet_pet(3);
        pet.speak(Some("first"));
        pet.advance(3000);
        pet.speak(Some("second"));
        pet.advance(1500);
        assert_eq!(pet.state.message, "second");
        pet.advance(2500);
        assert!(pet.state.message.is_empty());
        assert!(pet.timers.message.is_none());
    }
}
