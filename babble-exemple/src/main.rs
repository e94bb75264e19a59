use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rand::Rng;

use babble_core::events::UtteranceBus;
use babble_core::model::brain::Brain;

/// Snapshot file used by !wordsave / !wordrestore and the shutdown flush.
const SNAPSHOT_FILE: &str = "babble.saved";

/// Decides when the bot speaks without being asked.
///
/// The probability decision belongs to the driver, not to the model: the
/// chance starts above 1.0 so nothing fires before !speak arms it, is set
/// to 1.0 when chatter is toggled, and drops to 0.5 after each line the
/// bot speaks on its own.
struct ChatterPolicy {
    enabled: bool,
    next_speak_prob: f64,
}

impl ChatterPolicy {
    fn new() -> Self {
        Self {
            enabled: false,
            next_speak_prob: 2.0,
        }
    }

    fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.next_speak_prob = 1.0;
        self.enabled
    }

    fn should_speak(&mut self) -> bool {
        if self.enabled && rand::rng().random::<f64>() < self.next_speak_prob {
            self.next_speak_prob = 0.5;
            return true;
        }
        false
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Restore the previous session's graph if a snapshot exists,
    // otherwise start from an empty one.
    let brain = Arc::new(match Brain::load(SNAPSHOT_FILE) {
        Ok(brain) => brain,
        Err(_) => Brain::new(),
    });

    let learning = Arc::new(AtomicBool::new(true));
    let chatter = Arc::new(Mutex::new(ChatterPolicy::new()));

    // Feature modules register independently. Subscribers run in
    // registration order, so a line is learned before the bot may answer it.
    let mut bus = UtteranceBus::new();

    {
        let brain = Arc::clone(&brain);
        let learning = Arc::clone(&learning);
        bus.subscribe(move |text| {
            if learning.load(Ordering::Relaxed) {
                brain.learn(text);
            }
        });
    }

    {
        let brain = Arc::clone(&brain);
        let chatter = Arc::clone(&chatter);
        bus.subscribe(move |_text| {
            let mut policy = chatter.lock().unwrap_or_else(PoisonError::into_inner);
            if policy.should_speak() {
                let line = brain.generate();
                if !line.is_empty() {
                    println!("<babble> {line}");
                }
            }
        });
    }

    println!("babble console. Plain lines are learned; !help lists commands.");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let text = line.trim();

        if text.is_empty() {
            continue;
        }

        // Lines starting with '!' are commands and are never learned.
        if let Some(command) = text.strip_prefix('!') {
            match command {
                "speak" => {
                    let enabled = chatter
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .toggle();
                    println!("{}", if enabled { "Chatter enabled." } else { "Chatter disabled." });
                }
                "rant" => println!("<babble> {}", brain.generate()),
                "wordstats" => println!("{}", brain.stats()),
                "stupify" => {
                    let was_learning = learning.fetch_xor(true, Ordering::Relaxed);
                    if was_learning {
                        println!("Stupification level [8] reached");
                    } else {
                        println!("Learning mode resumed");
                    }
                }
                "wordsave" => match brain.save(SNAPSHOT_FILE) {
                    Ok(_) => println!("Word net saved."),
                    Err(e) => println!("Failed to save word net: {e}"),
                },
                "wordrestore" => match brain.restore(SNAPSHOT_FILE) {
                    Ok(_) => println!("Word net loaded. {}", brain.stats()),
                    Err(e) => println!("Failed to load word net: {e}"),
                },
                "help" => {
                    println!("!speak       toggle autonomous chatter");
                    println!("!rant        say one line on demand");
                    println!("!wordstats   show word net counters");
                    println!("!stupify     toggle learning off or on");
                    println!("!wordsave    save the word net to {SNAPSHOT_FILE}");
                    println!("!wordrestore load the word net from {SNAPSHOT_FILE}");
                    println!("!quit        save and exit");
                }
                "quit" => break,
                _ => println!("Unknown command: !{command}"),
            }
            continue;
        }

        bus.publish(text);
    }

    // Flush the graph on the way out.
    brain.save(SNAPSHOT_FILE)?;
    Ok(())
}
