pub mod equipment;

pub use equipment::{Equipment, EquipmentChanges, EquipmentFilter, EquipmentResponse, NewEquipment};
