//! Fleet dispatch backend
//!
//! Vehículos, conductores, viajes y solicitudes de despacho de una unidad,
//! con acceso por roles y aprobación de registros.

pub mod config;
pub mod controllers;
pub mod dispatch;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
