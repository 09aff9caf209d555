//! Confetti particles and the fixed-capacity pool that recycles them

use glam::Vec2;

use crate::consts::*;

/// A single confetti piece
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
    /// 0-100, decreases every tick
    pub life: f32,
    pub rotation: f32,
    pub spin: f32,
    pub active: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: 0xFFFFFF,
            size: 5.0,
            life: 0.0,
            rotation: 0.0,
            spin: 0.0,
            active: false,
        }
    }
}

impl Particle {
    /// Arm an inert particle
    pub fn spawn(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        color: u32,
        size: f32,
        rotation: f32,
        spin: f32,
    ) {
        self.pos = pos;
        self.vel = vel;
        self.color = color;
        self.size = size;
        self.life = PARTICLE_MAX_LIFE;
        self.rotation = rotation;
        self.spin = spin;
        self.active = true;
    }

    pub fn update(&mut self) {
        if !self.active {
            return;
        }

        self.vel.y += PARTICLE_GRAVITY;
        self.pos += self.vel;
        self.rotation += self.spin;
        // Air resistance on horizontal motion only
        self.vel.x *= PARTICLE_AIR_RESISTANCE;

        self.life -= PARTICLE_LIFE_DECAY;
        if self.life <= 0.0 {
            self.life = 0.0;
            self.active = false;
        }
    }

    /// Opacity for drawing (1 = fresh)
    pub fn opacity(&self) -> f32 {
        (self.life / PARTICLE_MAX_LIFE).clamp(0.0, 1.0)
    }
}

/// Fixed pool of particles. Never grows; spawns beyond capacity are dropped.
#[derive(Debug)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    /// Indices of inactive slots (stack)
    free: Vec<usize>,
    /// Indices of live particles, rebuilt every tick
    active: Vec<usize>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Arm a free particle. Returns false (and does nothing) when exhausted.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        color: u32,
        size: f32,
        rotation: f32,
        spin: f32,
    ) -> bool {
        let Some(idx) = self.free.pop() else {
            log::trace!("Particle pool exhausted, spawn dropped");
            return false;
        };
        self.slots[idx].spawn(pos, vel, color, size, rotation, spin);
        self.active.push(idx);
        true
    }

    /// Advance live particles and reclaim the ones that expired
    pub fn update(&mut self) {
        for &idx in &self.active {
            self.slots[idx].update();
        }

        let slots = &self.slots;
        let free = &mut self.free;
        self.active.retain(|&idx| {
            let alive = slots[idx].active;
            if !alive {
                free.push(idx);
            }
            alive
        });
    }

    /// Live particles in spawn order
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(|&idx| &self.slots[idx])
    }

    /// Deactivate everything
    pub fn clear(&mut self) {
        for &idx in &self.active {
            self.slots[idx].active = false;
            self.slots[idx].life = 0.0;
        }
        self.free.extend(self.active.drain(..));
    }
}
