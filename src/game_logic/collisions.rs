use crate::game_logic::{Car, Segment, overlap, TRAFFIC_OVERLAP};

/// Whether the player's footprint touches any scenery sprite on `segment`.
///
/// Sprites are anchored at their inner edge, so the footprint extends away from
/// the road on whichever side the sprite stands.
pub fn hits_scenery(segment: &Segment, player_x: f32, player_w: f32) -> bool {
    segment.sprites.iter().any(|placement| {
        let sprite_w = placement.sprite.world_width();
        let side = if placement.offset > 0.0 { 1.0 } else { -1.0 };
        let centre = placement.offset + sprite_w / 2.0 * side;
        overlap(player_x, player_w, centre, sprite_w, 1.0)
    })
}

/// The first slower car on `segment` the player is running into, if any.
pub fn hits_traffic<'a>(
    segment: &Segment,
    cars: &'a [Car],
    player_x: f32,
    player_w: f32,
    player_speed: f32,
) -> Option<&'a Car> {
    segment.cars.iter().map(|&id| &cars[id]).find(|car| {
        player_speed > car.speed
            && overlap(player_x, player_w, car.offset, car.sprite.world_width(), TRAFFIC_OVERLAP)
    })
}
