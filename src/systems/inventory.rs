//! Inventory and equipment interactions.
//!
//! Items move between exactly three owners: the ground list, an inventory slot
//! and an equipment slot. Every operation validates first and mutates second,
//! so a refusal leaves both containers as they were. None of these take a turn.

use crate::components::{EquipSlot, Item, ItemId, ItemStat, ItemType};
use crate::engine::GameState;
use crate::error::Refusal;
use crate::events::GameEvent;

/// Move the first ground item under the player into the first empty slot.
pub fn pickup(state: &mut GameState) -> Result<ItemId, Refusal> {
    let here = state.player.position;
    let ground_idx = state
        .ground_items
        .iter()
        .position(|g| g.position == here)
        .ok_or(Refusal::NothingToPickUp)?;
    let slot = state.player.first_empty_slot().ok_or(Refusal::InventoryFull)?;

    let item = state.ground_items.remove(ground_idx).item;
    let (id, name) = (item.id, item.name.clone());
    state.player.inventory[slot] = Some(item);
    state.emit(GameEvent::ItemPickedUp { item: id, name });
    Ok(id)
}

/// Equip an inventory item. A displaced item takes the freed inventory slot.
pub fn equip(state: &mut GameState, item_id: ItemId, slot: EquipSlot) -> Result<(), Refusal> {
    let idx = state.player.inventory_index(item_id).ok_or(Refusal::UnknownItem)?;
    let item_type = state.player.inventory[idx]
        .as_ref()
        .map(|item| item.item_type)
        .ok_or(Refusal::UnknownItem)?;
    if !slot.accepts(item_type) {
        return Err(Refusal::WrongSlot);
    }

    let incoming = state.player.inventory[idx].take();
    let displaced = std::mem::replace(state.player.equipment.slot_mut(slot), incoming);
    let displaced_id = displaced.as_ref().map(|item| item.id);
    state.player.inventory[idx] = displaced;
    state.player.refresh_stats();

    if let Some(old) = displaced_id {
        state.emit(GameEvent::ItemUnequipped { item: old, slot });
    }
    state.emit(GameEvent::ItemEquipped { item: item_id, slot });
    Ok(())
}

/// Move an equipped item back into the first empty inventory slot.
pub fn unequip(state: &mut GameState, slot: EquipSlot) -> Result<ItemId, Refusal> {
    let id = state
        .player
        .equipment
        .get(slot)
        .map(|item| item.id)
        .ok_or(Refusal::NothingEquipped)?;
    let free = state.player.first_empty_slot().ok_or(Refusal::InventoryFull)?;

    state.player.inventory[free] = state.player.equipment.slot_mut(slot).take();
    state.player.refresh_stats();
    state.emit(GameEvent::ItemUnequipped { item: id, slot });
    Ok(id)
}

/// Drink a consumable from the inventory. Returns the hp restored.
pub fn consume(state: &mut GameState, item_id: ItemId) -> Result<i32, Refusal> {
    let idx = state.player.inventory_index(item_id).ok_or(Refusal::UnknownItem)?;
    let heal = match &state.player.inventory[idx] {
        Some(item) if item.item_type == ItemType::Consumable => item.stat(ItemStat::Hp),
        Some(_) => return Err(Refusal::NotConsumable),
        None => return Err(Refusal::UnknownItem),
    };

    state.player.inventory[idx] = None;
    let healed = state.player.heal(heal);
    state.emit(GameEvent::ItemConsumed { item: item_id, healed });
    Ok(healed)
}

/// Destroy an item held in the inventory or in an equipment slot.
pub fn discard(state: &mut GameState, item_id: ItemId) -> Result<Item, Refusal> {
    let item = if let Some(idx) = state.player.inventory_index(item_id) {
        state.player.inventory[idx].take()
    } else if let Some(slot) = state.player.equipment.find(item_id) {
        let item = state.player.equipment.slot_mut(slot).take();
        state.player.refresh_stats();
        item
    } else {
        None
    };
    let item = item.ok_or(Refusal::UnknownItem)?;
    state.emit(GameEvent::ItemDiscarded {
        item: item.id,
        name: item.name.clone(),
    });
    Ok(item)
}

/// Exchange the contents of two inventory slots.
pub fn swap_slots(state: &mut GameState, a: usize, b: usize) -> Result<(), Refusal> {
    let len = state.player.inventory.len();
    if a >= len || b >= len {
        return Err(Refusal::InvalidSlot);
    }
    state.player.inventory.swap(a, b);
    Ok(())
}

/// Consume a consumable, otherwise equip the item into its own slot.
pub fn use_item(state: &mut GameState, item_id: ItemId) -> Result<(), Refusal> {
    let idx = state.player.inventory_index(item_id).ok_or(Refusal::UnknownItem)?;
    let item_type = state.player.inventory[idx]
        .as_ref()
        .map(|item| item.item_type)
        .ok_or(Refusal::UnknownItem)?;
    match item_type.equip_slot() {
        Some(slot) => equip(state, item_id, slot),
        None => consume(state, item_id).map(|_| ()),
    }
}
