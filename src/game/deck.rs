//! Card economy: deck construction, draw/discard/reshuffle, play validation.

use crate::game::{
    stats::DEFAULT_DECK,
    types::{Card, CardId, PlayerState},
};
use rand::seq::SliceRandom;

pub const MAX_HAND: usize = 4;

/// Build and shuffle the starting deck.
pub fn default_deck() -> Vec<Card> {
    let mut deck: Vec<Card> = DEFAULT_DECK
        .iter()
        .flat_map(|&(kind, copies)| (0..copies).map(move |_| Card::new(kind)))
        .collect();
    deck.shuffle(&mut rand::rng());
    deck
}

/// Move the front card of the deck into the hand.
///
/// No-op when the hand is full. An empty deck is refilled from the shuffled
/// discard pile first; with both empty nothing happens.
pub fn draw_card(player: &mut PlayerState) {
    if player.hand.len() >= MAX_HAND {
        return;
    }

    if player.deck.is_empty() {
        if player.discard_pile.is_empty() {
            return;
        }
        player.deck.append(&mut player.discard_pile);
        player.deck.shuffle(&mut rand::rng());
    }

    let card = player.deck.remove(0);
    player.hand.push(card);
}

/// Move `card_id` from hand to discard and return it; `None` if not in hand.
pub fn play_card(player: &mut PlayerState, card_id: CardId) -> Option<Card> {
    let pos = player.hand.iter().position(|c| c.id == card_id)?;
    let card = player.hand.remove(pos);
    player.discard_pile.push(card.clone());
    Some(card)
}

/// Undo a [`play_card`] whose play was rejected.
pub fn refund_card(player: &mut PlayerState, card: Card) {
    if let Some(pos) = player.discard_pile.iter().rposition(|c| c.id == card.id) {
        player.discard_pile.remove(pos);
    }
    player.hand.push(card);
}
