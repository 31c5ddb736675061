//! Growable GPU buffers.
//!
//! GPU buffers cannot be resized in place, so a write that exceeds the
//! current allocation replaces the buffer. Allocations never shrink.

use std::marker::PhantomData;

/// Smallest allocation handed to wgpu, in bytes.
const MIN_CAPACITY_BYTES: usize = 64;

/// Capacity to allocate for `needed` bytes when `current` is too small.
///
/// Doubles the request, but always grows by at least 1 KiB.
fn grown_capacity(current: usize, needed: usize) -> usize {
    (needed * 2).max(current + 1024)
}

/// Typed GPU buffer that reallocates when a write outgrows it.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity_bytes: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Empty buffer with room for `capacity` items.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity_bytes = (size_of::<T>() * capacity).max(MIN_CAPACITY_BYTES);
        Self {
            buffer: allocate(device, label, capacity_bytes, usage),
            capacity_bytes,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Replace the contents, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated, in which case any bind
    /// group referencing the old buffer is stale.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let reallocated = bytes.len() > self.capacity_bytes;
        if reallocated {
            self.buffer.destroy();
            self.capacity_bytes = grown_capacity(self.capacity_bytes, bytes.len());
            self.buffer =
                allocate(device, &self.label, self.capacity_bytes, self.usage);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.count = data.len();
        reallocated
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of items written.
    pub fn count(&self) -> usize {
        self.count
    }

    /// `true` when no items have been written.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Release GPU memory now rather than when the handle drops.
    pub fn destroy(&self) {
        log::debug!(
            "releasing buffer '{}' ({} bytes)",
            self.label,
            self.capacity_bytes
        );
        self.buffer.destroy();
    }
}

fn allocate(
    device: &wgpu::Device,
    label: &str,
    size: usize,
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_doubles_large_requests() {
        assert_eq!(grown_capacity(1024, 10_000), 20_000);
    }

    #[test]
    fn growth_adds_at_least_one_kib() {
        assert_eq!(grown_capacity(4096, 4100), 8200);
        assert_eq!(grown_capacity(4096, 100), 5120);
        assert!(grown_capacity(MIN_CAPACITY_BYTES, 65) >= 65);
    }
}
