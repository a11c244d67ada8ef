//! Growable GPU buffers.
//!
//! Buffers grow by 2x when data exceeds capacity and never shrink. Callers
//! learn about reallocation from the return value of `write` and must
//! rebuild any bind group that references the old buffer.

use std::marker::PhantomData;

/// Smallest allocation, so a buffer is always bindable even when empty.
const MIN_CAPACITY_BYTES: usize = 64;

/// Typed GPU buffer tracking an item count.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    /// Capacity in bytes.
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = (size_of::<T>() * capacity).max(MIN_CAPACITY_BYTES);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        log::debug!("allocating {label}: {capacity} bytes");
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write data to buffer, growing if necessary.
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len();

        let reallocated = if needed > self.capacity {
            // 2x growth, minimum 1KB
            let new_capacity = (needed * 2).max(self.capacity + 1024);
            self.buffer =
                Self::allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.count = data.len();

        reallocated
    }

    /// The underlying wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items written by the last `write`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Items that fit without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity / size_of::<T>()
    }
}
