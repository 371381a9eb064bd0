//! Cross-scene handoff of transferable objects.
//!
//! When a scene deactivates, each object it owns that its rectangle no longer
//! overlaps is offered to every other bound scene in ascending index order.
//! When it unloads, every object it owns is offered the same way. The first
//! scene whose rectangle overlaps the object's bounds takes it; there is no
//! attempt to find the best or closest match.

use scenestream_common::{Bounds2, ObjectId};
use scenestream_kernel::World;
use scenestream_registry::SceneRegistry;

use crate::binding::{BindingTable, Owner};
use crate::controller::StreamEvent;
use crate::error::StreamError;

/// Why a scene is handing its objects off.
///
/// A deactivating scene keeps the objects it still overlaps. An unloading
/// scene offers every object to its bound neighbours first and parks only
/// the ones nobody else can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Departure {
    /// Content is going dormant but stays loaded; unplaced objects stay put.
    Deactivate,
    /// Content is about to be released; every remaining object leaves.
    Unload,
}

/// Offer the objects owned by scene `index` to the other bound scenes.
pub(crate) fn transfer_out(
    index: usize,
    departure: Departure,
    registry: &SceneRegistry,
    table: &mut BindingTable,
    world: &World,
    events: &mut Vec<StreamEvent>,
) -> Result<(), StreamError> {
    let Some(binding) = table.get(index) else {
        return Ok(());
    };
    let rect = registry[index].rect;
    let owned: Vec<ObjectId> = binding.objects().iter().copied().collect();

    for id in owned {
        let Some(bounds) = world.bounds(id) else {
            tracing::debug!(%id, scene = index, "dropping despawned object from ownership");
            table.detach(id);
            continue;
        };

        let inside = rect.contains(&bounds);
        if inside && departure == Departure::Deactivate {
            continue;
        }

        match find_destination(registry, table, &bounds, Some(index)) {
            Some(to) => {
                table.transfer(id, to).inspect_err(|e| {
                    tracing::error!(%id, from = index, to, error = %e, "object transfer failed");
                })?;
                tracing::debug!(%id, from = index, to, "transferred object");
                events.push(StreamEvent::Transferred {
                    object: id,
                    from: Owner::Scene(index),
                    to,
                });
            }
            None if departure == Departure::Unload => {
                if inside {
                    tracing::debug!(%id, scene = index, "parking object with unloading scene");
                } else {
                    tracing::warn!(
                        %id,
                        scene = index,
                        "no loaded scene contains object; parking it in limbo"
                    );
                }
                table.park(id);
                events.push(StreamEvent::Parked {
                    object: id,
                    from: index,
                });
            }
            None => {
                tracing::debug!(
                    %id,
                    scene = index,
                    "no destination; object stays with dormant scene"
                );
            }
        }
    }
    Ok(())
}

/// Re-offer every limbo object to the bound scenes.
pub(crate) fn resolve_limbo(
    registry: &SceneRegistry,
    table: &mut BindingTable,
    world: &World,
    events: &mut Vec<StreamEvent>,
) -> Result<(), StreamError> {
    if table.limbo().is_empty() {
        return Ok(());
    }
    let waiting: Vec<ObjectId> = table.limbo().iter().copied().collect();
    for id in waiting {
        let Some(bounds) = world.bounds(id) else {
            table.detach(id);
            continue;
        };
        if let Some(to) = find_destination(registry, table, &bounds, None) {
            table.transfer(id, to).inspect_err(|e| {
                tracing::error!(%id, to, error = %e, "limbo placement failed");
            })?;
            tracing::debug!(%id, to, "placed object out of limbo");
            events.push(StreamEvent::Transferred {
                object: id,
                from: Owner::Limbo,
                to,
            });
        }
    }
    Ok(())
}

/// First bound scene (ascending index, skipping `skip`) whose rectangle overlaps `bounds`.
pub(crate) fn find_destination(
    registry: &SceneRegistry,
    table: &BindingTable,
    bounds: &Bounds2,
    skip: Option<usize>,
) -> Option<usize> {
    registry
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip && table.is_bound(*i))
        .find(|(_, scene)| scene.rect.contains(bounds))
        .map(|(i, _)| i)
}
