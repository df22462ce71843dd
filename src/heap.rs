/// Array-backed binary min-heap.
///
/// The element type's `Ord` decides everything, so a `Request` heap stays
/// stable as long as `Request::cmp` breaks key ties by admission order.
/// Indices are 0-based: parent at `(i - 1) / 2`, children at `2i + 1` and
/// `2i + 2`.
#[derive(Debug, Default)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> MinHeap<T> {
        MinHeap { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Appends as a new leaf and sifts up until the parent orders
    /// before-or-equal.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the minimum, or `None` on an empty heap. The
    /// last leaf replaces the root and sifts down toward its smaller child.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop();
        self.sift_down(0);
        min
    }

    fn sift_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.items[child] < self.items[parent] {
                self.items.swap(child, parent);
                child = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut parent: usize) {
        loop {
            let left = 2 * parent + 1;
            let right = left + 1;
            let mut smallest = parent;
            if left < self.items.len() && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < self.items.len() && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == parent {
                break;
            }
            self.items.swap(parent, smallest);
            parent = smallest;
        }
    }
}
