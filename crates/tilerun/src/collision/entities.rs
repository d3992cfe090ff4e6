use crate::components::entity::Entity;

/// Checks one entity against the rest of the level's entities.
/// Called once per entity per frame during the collision pass.
pub trait EntityCollider {
    fn check(&self, index: usize, entities: &mut [Entity]);
}

/// Notifies the subject of every other entity whose box overlaps its own.
/// Only the subject is told; the other side gets its own turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapCollider;

impl EntityCollider for OverlapCollider {
    fn check(&self, index: usize, entities: &mut [Entity]) {
        if index >= entities.len() {
            return;
        }
        let (before, rest) = entities.split_at_mut(index);
        let Some((subject, after)) = rest.split_first_mut() else {
            return;
        };

        for other in before.iter().chain(after.iter()) {
            if subject.bounds().overlaps(&other.bounds()) {
                subject.collides(other);
            }
        }
    }
}
