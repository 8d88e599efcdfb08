//! Cross-subsystem integration flows.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod persistence;
#[cfg(test)]
mod price_flow;
#[cfg(test)]
mod relay_flow;
