//! One-shot developer tools.
//!
//! A [`Tool`] is loaded once when it is registered and activated each time the user
//! presses its button in the tool bar.

pub mod map;

use bevy::prelude::*;
use thiserror::Error;

use crate::inspector::plugin::InspectorSet;

pub use map::{
    AccessError, DirectTileAccess, HideMapTool, MapRefresh, MapTile, PublicApiOnly, TileAccess,
    TilesHandle, WorldMap,
};

/// A registrable, activatable unit of developer functionality.
pub trait Tool: Send + Sync + 'static {
    /// Unique key, also used to look up the tool's icon.
    fn icon_key(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Called exactly once, when the tool is registered.
    fn load(&mut self, _world: &mut World) {}

    /// Called every time the user triggers the tool.
    fn activate(&mut self, world: &mut World);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("a tool with icon key \"{0}\" is already registered")]
    DuplicateKey(String),
    #[error("no tool registered with icon key \"{0}\"")]
    UnknownTool(String),
}

/// All registered tools, in registration order.
#[derive(Resource, Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn contains(&self, icon_key: &str) -> bool {
        self.tools.iter().any(|tool| tool.icon_key() == icon_key)
    }

    pub fn get_mut(&mut self, icon_key: &str) -> Option<&mut Box<dyn Tool>> {
        self.tools.iter_mut().find(|tool| tool.icon_key() == icon_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|tool| tool.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Loads `tool` and adds it to the [`ToolRegistry`].
pub fn register_tool(world: &mut World, mut tool: impl Tool) -> Result<(), ToolError> {
    let key = tool.icon_key();
    if world
        .get_resource::<ToolRegistry>()
        .is_some_and(|registry| registry.contains(key))
    {
        return Err(ToolError::DuplicateKey(key.to_string()));
    }

    tool.load(world);
    info!("Loaded tool \"{}\"", tool.display_name());
    world
        .get_resource_or_init::<ToolRegistry>()
        .tools
        .push(Box::new(tool));
    Ok(())
}

/// Runs the tool registered under `icon_key`.
pub fn activate_tool(world: &mut World, icon_key: &str) -> Result<(), ToolError> {
    if !world.contains_resource::<ToolRegistry>() {
        return Err(ToolError::UnknownTool(icon_key.to_string()));
    }

    world.resource_scope(|world, mut registry: Mut<ToolRegistry>| -> Result<(), ToolError> {
        let tool = registry
            .get_mut(icon_key)
            .ok_or_else(|| ToolError::UnknownTool(icon_key.to_string()))?;
        debug!("Activating tool \"{}\"", tool.display_name());
        tool.activate(world);
        Ok(())
    })
}

/// Requests activation of a tool by icon key.
#[derive(Event, Clone, Debug)]
pub struct ActivateTool {
    pub icon_key: String,
}

/// Activation requests waiting for exclusive world access.
#[derive(Resource, Default)]
pub struct PendingToolActivations {
    pub requests: Vec<String>,
}

fn queue_tool_activation(trigger: On<ActivateTool>, mut pending: ResMut<PendingToolActivations>) {
    pending.requests.push(trigger.icon_key.clone());
}

/// Exclusive system that runs queued tool activations.
pub fn apply_pending_tool_activations(world: &mut World) {
    let requests = {
        let mut pending = world.resource_mut::<PendingToolActivations>();
        std::mem::take(&mut pending.requests)
    };

    for icon_key in requests {
        if let Err(err) = activate_tool(world, &icon_key) {
            warn!("{err}");
        }
    }
}

/// Wires tool activation into the app.
pub struct ToolsPlugin;

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToolRegistry>()
            .init_resource::<PendingToolActivations>()
            .add_observer(queue_tool_activation)
            .add_systems(
                Update,
                apply_pending_tool_activations.in_set(InspectorSet::Tick),
            );
    }
}

/// Registers tools on an [`App`].
pub trait ToolAppExt {
    /// Loads `tool` now and lists it in the tool bar. Duplicate keys are logged and skipped.
    fn register_tool(&mut self, tool: impl Tool) -> &mut Self;
}

impl ToolAppExt for App {
    fn register_tool(&mut self, tool: impl Tool) -> &mut Self {
        if let Err(err) = register_tool(self.world_mut(), tool) {
            warn!("{err}");
        }
        self
    }
}
