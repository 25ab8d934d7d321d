//! Hover dispatch layers
//!
//! Widgets subscribe to pointer-move dispatch at an integer layer. Moves are
//! delivered to the highest layer first and, within a layer, to the most
//! recently subscribed widget first, so widgets added later (drawn on top)
//! see the pointer before the ones beneath them.

use std::collections::BTreeMap;

use crate::widget::WidgetId;

/// Layered subscription list for pointer-move dispatch
#[derive(Debug, Clone, Default)]
pub struct HoverLayers {
    layers: BTreeMap<i32, Vec<WidgetId>>,
}

impl HoverLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `id` at `layer`; re-subscribing moves it to the front of
    /// that layer
    pub fn subscribe(&mut self, id: WidgetId, layer: i32) {
        self.unsubscribe(id, layer);
        self.layers.entry(layer).or_default().push(id);
    }

    pub fn unsubscribe(&mut self, id: WidgetId, layer: i32) {
        if let Some(widgets) = self.layers.get_mut(&layer) {
            widgets.retain(|widget| *widget != id);
            if widgets.is_empty() {
                self.layers.remove(&layer);
            }
        }
    }

    /// Move `id` from layer `from` to layer `to`
    pub fn change_layer(&mut self, id: WidgetId, from: i32, to: i32) {
        self.unsubscribe(id, from);
        self.subscribe(id, to);
    }

    /// Snapshot of widgets in dispatch order
    pub fn dispatch_order(&self) -> Vec<WidgetId> {
        self.layers
            .values()
            .rev()
            .flat_map(|widgets| widgets.iter().rev().copied())
            .collect()
    }

    /// Drop every handle `is_live` rejects; returns how many were dropped
    pub fn purge(&mut self, is_live: impl Fn(WidgetId) -> bool) -> usize {
        let mut purged = 0;
        self.layers.retain(|_, widgets| {
            let before = widgets.len();
            widgets.retain(|widget| is_live(*widget));
            purged += before - widgets.len();
            !widgets.is_empty()
        });
        purged
    }

    /// Number of subscribed widgets
    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<WidgetId> {
        let mut arena: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn test_dispatch_order_is_top_layer_then_newest() {
        let ids = ids(4);
        let mut layers = HoverLayers::new();
        layers.subscribe(ids[0], 0);
        layers.subscribe(ids[1], 0);
        layers.subscribe(ids[2], 5);
        layers.subscribe(ids[3], -1);

        assert_eq!(layers.dispatch_order(), vec![ids[2], ids[1], ids[0], ids[3]]);
    }

    #[test]
    fn test_change_layer_moves_subscription() {
        let ids = ids(2);
        let mut layers = HoverLayers::new();
        layers.subscribe(ids[0], 0);
        layers.subscribe(ids[1], 0);

        layers.change_layer(ids[1], 0, -3);

        assert_eq!(layers.dispatch_order(), vec![ids[0], ids[1]]);
        assert_eq!(layers.len(), 2);
    }

    #[test]
    fn test_purge_drops_dead_handles() {
        let ids = ids(3);
        let mut layers = HoverLayers::new();
        for id in &ids {
            layers.subscribe(*id, 1);
        }

        let purged = layers.purge(|id| id == ids[1]);

        assert_eq!(purged, 2);
        assert_eq!(layers.dispatch_order(), vec![ids[1]]);
    }
}
