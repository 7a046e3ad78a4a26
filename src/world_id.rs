use sha2::{Digest, Sha256};
use uuid::Uuid;

const SHORT_ID_LEN: usize = 7;

pub fn generate_world_id<F>(mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    for _ in 0..64 {
        let seed = Uuid::now_v7().to_string();
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        let candidate = &digest[..SHORT_ID_LEN];
        if !exists(candidate) {
            return candidate.to_string();
        }
    }

    Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::generate_world_id;

    #[test]
    fn generated_ids_are_short_lowercase_hex() {
        let id = generate_world_id(|_| false);
        assert_eq!(id.len(), 7);
        assert!(id.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_avoid_existing_ones() {
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..200 {
            let id = generate_world_id(|candidate| seen.contains(candidate));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn falls_back_to_full_uuid_when_every_short_id_collides() {
        let id = generate_world_id(|_| true);
        assert_eq!(id.len(), 32);
    }
}
