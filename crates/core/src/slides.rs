use serde::Deserialize;

/// One page of the loaded presentation. Immutable once constructed; the
/// viewer only ever reads it by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// 1-based, stable for the lifetime of the session.
    pub id: usize,
    /// Locator for the rendered image.
    pub image_url: String,
    /// Identifier the backend collaborators use to refer to this slide's
    /// stored asset. Slides without one cannot take part in feedback turns.
    pub remote_url: Option<String>,
}

/// Wire shape of one slide entry as the upload service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct SlideDescriptor {
    pub index: usize,
    pub image_url: String,
    #[serde(default)]
    pub s3_url: Option<String>,
}

impl From<SlideDescriptor> for Slide {
    fn from(descriptor: SlideDescriptor) -> Self {
        Slide {
            id: descriptor.index + 1,
            image_url: descriptor.image_url,
            remote_url: descriptor.s3_url,
        }
    }
}

/// Holds the ordered slide sequence and the current position. The current
/// index is the only mutable field and moves only through `next` /
/// `previous`, clamped to the sequence bounds.
pub struct SlideContext {
    slides: Vec<Slide>,
    current: usize,
}

impl SlideContext {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, current: 0 }
    }

    pub fn from_descriptors(descriptors: Vec<SlideDescriptor>) -> Self {
        Self::new(descriptors.into_iter().map(Slide::from).collect())
    }

    /// Advances by one slide. Returns whether the index actually moved;
    /// at the last slide this is a no-op.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves back by one slide, clamped at the first.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// The slide at the current index, or `None` for an empty sequence.
    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}
