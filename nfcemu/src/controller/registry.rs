// nfcemu-rs/nfcemu/src/controller/registry.rs

use std::collections::HashMap;

use log::debug;

use crate::controller::Controller;
use crate::types::InstanceId;
use crate::{Error, Result};

/// Controller instances of one emulated machine, keyed by instance id.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<InstanceId, Controller>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: InstanceId, controller: Controller) -> Result<()> {
        if self.controllers.contains_key(&id) {
            return Err(Error::DuplicateInstance(id.as_u32()));
        }
        debug!("nfc controller {} registered", id);
        self.controllers.insert(id, controller);
        Ok(())
    }

    pub fn unregister(&mut self, id: InstanceId) -> Result<Controller> {
        self.controllers
            .remove(&id)
            .ok_or(Error::UnknownInstance(id.as_u32()))
    }

    pub fn get(&self, id: InstanceId) -> Result<&Controller> {
        self.controllers
            .get(&id)
            .ok_or(Error::UnknownInstance(id.as_u32()))
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Result<&mut Controller> {
        self.controllers
            .get_mut(&id)
            .ok_or(Error::UnknownInstance(id.as_u32()))
    }

    /// Bus read on instance `id`.
    pub fn read(&self, id: InstanceId, offset: usize) -> Result<u8> {
        self.get(id)?.try_read(offset)
    }

    /// Bus write on instance `id`.
    pub fn write(&mut self, id: InstanceId, offset: usize, value: u8) -> Result<()> {
        self.get_mut(id)?.try_write(offset, value)
    }

    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.controllers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
