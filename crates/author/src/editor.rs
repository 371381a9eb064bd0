use scenestream_common::SceneRect;
use scenestream_registry::{RegistryError, SceneDescriptor, SceneRegistry};

/// A layout edit that can be applied to the registry and reversed.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutCommand {
    /// Insert a scene at an index. Undo = remove it.
    Insert {
        index: usize,
        descriptor: SceneDescriptor,
    },
    /// Remove a scene from an index. Undo = re-insert it.
    Remove {
        index: usize,
        descriptor: SceneDescriptor,
    },
    /// Replace a scene's descriptor. Undo = restore the old one.
    Replace {
        index: usize,
        old: SceneDescriptor,
        new: SceneDescriptor,
    },
}

impl LayoutCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { index, descriptor } => Self::Remove {
                index: *index,
                descriptor: descriptor.clone(),
            },
            Self::Remove { index, descriptor } => Self::Insert {
                index: *index,
                descriptor: descriptor.clone(),
            },
            Self::Replace { index, old, new } => Self::Replace {
                index: *index,
                old: new.clone(),
                new: old.clone(),
            },
        }
    }
}

/// Errors from edit operations.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Layout editor with undo/redo support.
///
/// Operates on a `SceneRegistry` passed by the caller and tracks every edit in
/// undo/redo stacks. A new edit clears the redo stack.
#[derive(Debug, Default)]
pub struct LayoutEditor {
    undo_stack: Vec<LayoutCommand>,
    redo_stack: Vec<LayoutCommand>,
}

impl LayoutEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unassigned scene with the default rectangle. Returns its index.
    pub fn add_scene(&mut self, registry: &mut SceneRegistry) -> usize {
        let index = registry.add_scene();
        let descriptor = registry[index].clone();
        self.record(LayoutCommand::Insert { index, descriptor });
        index
    }

    /// Append a fully specified scene. Returns its index.
    pub fn push_scene(
        &mut self,
        registry: &mut SceneRegistry,
        descriptor: SceneDescriptor,
    ) -> Result<usize, EditError> {
        let index = registry.push(descriptor)?;
        let descriptor = registry[index].clone();
        self.record(LayoutCommand::Insert { index, descriptor });
        Ok(index)
    }

    /// Remove a scene.
    pub fn remove_scene(
        &mut self,
        registry: &mut SceneRegistry,
        index: usize,
    ) -> Result<SceneDescriptor, EditError> {
        let descriptor = registry.remove(index)?;
        self.record(LayoutCommand::Remove {
            index,
            descriptor: descriptor.clone(),
        });
        Ok(descriptor)
    }

    /// Move or resize a scene. The stored size is floored to the registry minimum.
    pub fn set_rect(
        &mut self,
        registry: &mut SceneRegistry,
        index: usize,
        rect: SceneRect,
    ) -> Result<(), EditError> {
        let old = registry
            .get(index)
            .cloned()
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: registry.count(),
            })?;
        registry.set_rect(index, rect)?;
        let new = registry[index].clone();
        self.record(LayoutCommand::Replace { index, old, new });
        Ok(())
    }

    /// Rename a scene. `None` marks it unassigned.
    pub fn rename(
        &mut self,
        registry: &mut SceneRegistry,
        index: usize,
        name: Option<String>,
    ) -> Result<(), EditError> {
        let old = registry
            .get(index)
            .cloned()
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: registry.count(),
            })?;
        registry.rename(index, name)?;
        let new = registry[index].clone();
        self.record(LayoutCommand::Replace { index, old, new });
        Ok(())
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, registry: &mut SceneRegistry) -> Result<bool, EditError> {
        let Some(cmd) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = apply_command(registry, &cmd.inverse()) {
            self.undo_stack.push(cmd);
            return Err(e);
        }
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, registry: &mut SceneRegistry) -> Result<bool, EditError> {
        let Some(cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = apply_command(registry, &cmd) {
            self.redo_stack.push(cmd);
            return Err(e);
        }
        self.undo_stack.push(cmd);
        Ok(true)
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, cmd: LayoutCommand) {
        tracing::debug!(?cmd, "layout edit");
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
    }
}

fn apply_command(registry: &mut SceneRegistry, cmd: &LayoutCommand) -> Result<(), EditError> {
    match cmd {
        LayoutCommand::Insert { index, descriptor } => {
            registry.insert(*index, descriptor.clone())?;
        }
        LayoutCommand::Remove { index, .. } => {
            registry.remove(*index)?;
        }
        LayoutCommand::Replace { index, new, .. } => {
            registry.set(*index, new.clone())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_undo() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();

        editor.add_scene(&mut reg);
        assert_eq!(reg.count(), 1);

        assert!(editor.undo(&mut reg).unwrap());
        assert_eq!(reg.count(), 0);
    }

    #[test]
    fn add_undo_redo() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();

        let index = editor.add_scene(&mut reg);
        let added = reg[index].clone();
        editor.undo(&mut reg).unwrap();
        assert!(reg.is_empty());

        editor.redo(&mut reg).unwrap();
        assert_eq!(reg[index], added);
    }

    #[test]
    fn remove_and_undo_restores_position() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        editor
            .push_scene(&mut reg, SceneDescriptor::new("a", SceneRect::new(0, 0, 10, 10)))
            .unwrap();
        editor
            .push_scene(&mut reg, SceneDescriptor::new("b", SceneRect::new(10, 0, 10, 10)))
            .unwrap();

        editor.remove_scene(&mut reg, 0).unwrap();
        assert_eq!(reg.find_index_by_name("b"), Some(0));

        editor.undo(&mut reg).unwrap();
        assert_eq!(reg.find_index_by_name("a"), Some(0));
        assert_eq!(reg.find_index_by_name("b"), Some(1));
    }

    #[test]
    fn set_rect_and_undo() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        let index = editor.add_scene(&mut reg);
        let before = reg[index].rect;

        editor
            .set_rect(&mut reg, index, SceneRect::new(5, 5, 3, 3))
            .unwrap();
        assert_eq!(reg[index].rect, SceneRect::new(5, 5, 10, 10));

        editor.undo(&mut reg).unwrap();
        assert_eq!(reg[index].rect, before);
    }

    #[test]
    fn rename_and_undo() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        let index = editor.add_scene(&mut reg);

        editor.rename(&mut reg, index, Some("cave".into())).unwrap();
        assert_eq!(reg.find_index_by_name("cave"), Some(index));

        editor.undo(&mut reg).unwrap();
        assert_eq!(reg.find_index_by_name("cave"), None);
    }

    #[test]
    fn rejected_rename_is_not_recorded() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        editor
            .push_scene(&mut reg, SceneDescriptor::new("a", SceneRect::new(0, 0, 10, 10)))
            .unwrap();
        let second = editor.add_scene(&mut reg);

        assert!(editor.rename(&mut reg, second, Some("a".into())).is_err());
        assert_eq!(editor.undo_count(), 2);
    }

    #[test]
    fn redo_cleared_on_new_edit() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();

        editor.add_scene(&mut reg);
        editor.undo(&mut reg).unwrap();
        assert!(editor.can_redo());

        editor.add_scene(&mut reg);
        assert!(!editor.can_redo());
    }

    #[test]
    fn undo_and_redo_empty_return_false() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        assert!(!editor.undo(&mut reg).unwrap());
        assert!(!editor.redo(&mut reg).unwrap());
    }

    #[test]
    fn remove_out_of_range_returns_error() {
        let mut reg = SceneRegistry::new();
        let mut editor = LayoutEditor::new();
        assert!(editor.remove_scene(&mut reg, 3).is_err());
        assert!(!editor.can_undo());
    }
}
