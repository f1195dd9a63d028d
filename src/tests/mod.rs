mod partial;
mod properties;
