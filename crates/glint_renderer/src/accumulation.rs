//! Progressive accumulation over ping-pong buffers.
//!
//! Every frame renders one fresh sample per pixel and blends it into
//! the running average: `(acc * n + new) / (n + 1)` where `n` is the
//! number of frames already accumulated. Two buffers alternate roles,
//! the read buffer holding the previous average and the write buffer
//! receiving the blended result; the roles swap with the frame index
//! parity so neither buffer is ever read and written in the same
//! frame.

use glint_math::Vec3;

/// Linear HDR image, row-major.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width * height) as usize],
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: Vec3) {
        self.pixels[(y * self.width + x) as usize] = value;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Vec3::ZERO);
    }
}

/// Drives the accumulation protocol: frame counting, reset latching
/// and the ping-pong buffer swap.
pub struct AccumulationController {
    buffers: [ImageBuffer; 2],
    frame_index: u32,
    reset_pending: bool,
}

impl AccumulationController {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffers: [ImageBuffer::new(width, height), ImageBuffer::new(width, height)],
            frame_index: 0,
            reset_pending: true,
        }
    }

    /// Number of frames accumulated so far.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Latch a reset; it takes effect at the start of the next frame.
    /// Multiple requests before that frame collapse into one.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Resize both buffers, which also forces a reset.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.buffers[0].width && height == self.buffers[0].height {
            return;
        }
        self.buffers = [ImageBuffer::new(width, height), ImageBuffer::new(width, height)];
        self.reset_pending = true;
    }

    /// Apply any pending reset. Call once at the start of each frame,
    /// before rendering the new sample.
    pub fn begin_frame(&mut self) {
        if self.reset_pending {
            self.frame_index = 0;
            self.reset_pending = false;
        }
    }

    fn write_index(&self) -> usize {
        (self.frame_index % 2) as usize
    }

    /// The buffer holding the current average (what a display pass
    /// should read). Before any frame has accumulated this is zeroed.
    pub fn current(&self) -> &ImageBuffer {
        // After frame n completes, the average lives in the buffer
        // frame n wrote to
        &self.buffers[(self.frame_index.wrapping_sub(1) % 2) as usize]
    }

    /// Blend a freshly rendered frame into the running average and
    /// advance the frame counter.
    ///
    /// At `frame_index == 0` the new frame is copied verbatim, so a
    /// reset never mixes stale history into the first sample.
    pub fn accumulate(&mut self, new_frame: &ImageBuffer) {
        let n = self.frame_index;
        let write = self.write_index();

        if n == 0 {
            self.buffers[write].pixels.copy_from_slice(&new_frame.pixels);
        } else {
            let weight = n as f32;
            let inv = 1.0 / (weight + 1.0);
            // Split borrow: read and write are distinct indices
            let (a, b) = self.buffers.split_at_mut(1);
            let (read_buf, write_buf) = if write == 0 {
                (&b[0], &mut a[0])
            } else {
                (&a[0], &mut b[0])
            };
            for ((dst, &acc), &fresh) in write_buf
                .pixels
                .iter_mut()
                .zip(read_buf.pixels.iter())
                .zip(new_frame.pixels.iter())
            {
                *dst = (acc * weight + fresh) * inv;
            }
        }

        self.frame_index += 1;
    }
}
