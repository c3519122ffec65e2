/*!
 * Protocol layer — what travels through the queue and over the wire.
 *
 * - `types` — ConnectionConfig, DeliveryJob, WorkerMsg, the Auth collaborator
 * - `constants` — collector path, header names, queue capacity
 */

pub mod constants;
pub mod types;
