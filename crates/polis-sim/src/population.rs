//! Candidate population for new sessions.
//!
//! The population is read from a JSON array of personas. Missing fields
//! take their defaults, so a file may carry as little as a name per
//! persona. When the file does not exist a population is generated from a
//! seeded random source instead, so repeated sessions look alike.

use std::io::ErrorKind;
use std::path::Path;

use polis_core::EngineError;
use polis_types::{Persona, PersonaId, Sex};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Builder;

/// Most friends a persona is given when friendships are generated.
pub const MAX_FRIENDS: usize = 5;

/// Chance that a generated persona owns a firm.
const FIRM_OWNER_PROB: f64 = 0.05;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Ben", "Chloe", "Dev", "Elena", "Femi", "Grace", "Hiro", "Iris", "Jamal", "Kofi",
    "Lena", "Marco", "Nadia", "Omar", "Priya", "Quinn", "Rosa", "Sam", "Tariq", "Uma", "Victor",
    "Wen", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abara", "Brooks", "Castillo", "Dietrich", "Eze", "Fischer", "Garcia", "Haddad", "Ito",
    "Jensen", "Kowalski", "Lopez", "Mensah", "Nguyen", "Okafor", "Park", "Rossi", "Silva",
    "Tanaka", "Volkov", "Walsh", "Zhang",
];

const NEIGHBORHOODS: &[&str] = &[
    "Astoria", "Bushwick", "Chelsea", "Flatbush", "Harlem", "Jamaica", "Riverdale",
    "Williamsburg",
];

const EDUCATION: &[&str] = &[
    "less than high school",
    "high school",
    "some college",
    "bachelor's degree",
    "graduate degree",
];

const OCCUPATIONS: &[&str] = &[
    "clerk", "nurse", "driver", "teacher", "cook", "mechanic", "programmer", "cashier",
];

/// Read a population file.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns [`EngineError::PopulationIo`] if the file exists but cannot be
/// read, or [`EngineError::PopulationParse`] if it is not a JSON array of
/// personas.
pub fn load(path: &Path) -> Result<Option<Vec<Persona>>, EngineError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No population file");
            return Ok(None);
        }
        Err(source) => {
            return Err(EngineError::PopulationIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let people: Vec<Persona> =
        serde_json::from_str(&contents).map_err(|source| EngineError::PopulationParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), count = people.len(), "Population loaded");
    Ok(Some(people))
}

/// Generate `count` personas with random attributes and friendships.
pub fn generate(count: usize, rng: &mut StdRng) -> Vec<Persona> {
    let mut people: Vec<Persona> = (0..count).map(|_| random_persona(rng)).collect();
    assign_friends(&mut people, rng);
    info!(count, "Population generated");
    people
}

fn random_persona(rng: &mut StdRng) -> Persona {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Doe");
    let mut persona = Persona::named(format!("{first} {last}"));
    persona.id = PersonaId::from(Builder::from_random_bytes(rng.random()).into_uuid());
    persona.sex = if rng.random_bool(0.5) {
        Sex::Female
    } else {
        Sex::Male
    };
    persona.age = rng.random_range(18..=80);
    persona.education = EDUCATION.choose(rng).copied().unwrap_or_default().to_owned();
    persona.neighborhood = NEIGHBORHOODS.choose(rng).copied().unwrap_or_default().to_owned();
    persona.occupation = OCCUPATIONS.choose(rng).map(|s| (*s).to_owned());
    persona.cash = Decimal::from(rng.random_range(0_u32..=5_000));
    persona.firm_owner = rng.random_bool(FIRM_OWNER_PROB);
    persona
}

/// Give every persona up to [`MAX_FRIENDS`] random friends.
///
/// Populations that already carry friendships are left untouched.
/// Friendship is not required to be mutual, and nobody befriends
/// themselves.
pub fn assign_friends(people: &mut [Persona], rng: &mut StdRng) {
    if people.len() < 2 || people.iter().any(|p| !p.friends.is_empty()) {
        return;
    }
    let ids: Vec<PersonaId> = people.iter().map(|p| p.id).collect();
    for persona in people.iter_mut() {
        let wanted = rng.random_range(0..=MAX_FRIENDS);
        let mut candidates: Vec<PersonaId> =
            ids.iter().copied().filter(|id| *id != persona.id).collect();
        candidates.shuffle(rng);
        candidates.truncate(wanted);
        persona.friends = candidates;
    }
}
