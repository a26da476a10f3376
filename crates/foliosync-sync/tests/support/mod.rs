//! Shared test support: an in-memory gallery provider
//!
//! Implements [`IGalleryProvider`] against a mutable in-process tree so
//! engine tests can run real sync passes, inspect what was created, and
//! script failures (auth, group creation, photoset load) without a network.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, bail};
use chrono::{DateTime, Duration, Utc};
use foliosync_core::domain::access::AccessPolicy;
use foliosync_core::domain::remote::{RemoteGroup, RemoteId, RemotePhoto, RemotePhotoset};
use foliosync_core::ports::gallery::{GroupUpdate, IGalleryProvider, PhotosetUpdate};

// ============================================================================
// Stored state
// ============================================================================

#[derive(Debug, Clone)]
struct StoredPhoto {
    id: String,
    file_name: String,
    uploaded_on: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredPhotoset {
    id: String,
    title: String,
    caption: Option<String>,
    custom_reference: Option<String>,
    photos: Vec<StoredPhoto>,
}

#[derive(Debug, Clone)]
struct StoredGroup {
    id: String,
    title: String,
    custom_reference: Option<String>,
    groups: Vec<StoredGroup>,
    photosets: Vec<StoredPhotoset>,
}

/// Call counts, for idempotence assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub group_creates: u32,
    pub photoset_creates: u32,
    pub photoset_loads: u32,
    pub uploads: u32,
    pub replaces: u32,
    pub deletes: u32,
    pub group_access_updates: u32,
    pub photoset_access_updates: u32,
    pub photo_access_updates: u32,
}

#[derive(Debug)]
struct State {
    root: StoredGroup,
    next_id: u64,
    counts: Counts,
    fail_auth: bool,
    fail_group_titles: HashSet<String>,
    fail_photoset_load_refs: HashSet<String>,
}

// ============================================================================
// Tree helpers
// ============================================================================

fn find_group_mut<'a>(group: &'a mut StoredGroup, id: &str) -> Option<&'a mut StoredGroup> {
    if group.id == id {
        return Some(group);
    }
    group
        .groups
        .iter_mut()
        .find_map(|child| find_group_mut(child, id))
}

fn find_group_by_title<'a>(group: &'a StoredGroup, title: &str) -> Option<&'a StoredGroup> {
    if group.title == title {
        return Some(group);
    }
    group
        .groups
        .iter()
        .find_map(|child| find_group_by_title(child, title))
}

fn find_photoset_mut<'a>(group: &'a mut StoredGroup, id: &str) -> Option<&'a mut StoredPhotoset> {
    if let Some(ps) = group.photosets.iter_mut().find(|ps| ps.id == id) {
        return Some(ps);
    }
    group
        .groups
        .iter_mut()
        .find_map(|child| find_photoset_mut(child, id))
}

fn for_each_photoset_mut(group: &mut StoredGroup, f: &mut impl FnMut(&mut StoredPhotoset)) {
    for ps in &mut group.photosets {
        f(ps);
    }
    for child in &mut group.groups {
        for_each_photoset_mut(child, f);
    }
}

fn collect_references(group: &StoredGroup, out: &mut Vec<String>) {
    if let Some(reference) = &group.custom_reference {
        out.push(reference.clone());
    }
    for ps in &group.photosets {
        if let Some(reference) = &ps.custom_reference {
            out.push(reference.clone());
        }
    }
    for child in &group.groups {
        collect_references(child, out);
    }
}

fn photo_snapshot(photo: &StoredPhoto) -> RemotePhoto {
    RemotePhoto {
        id: RemoteId::new(photo.id.clone()),
        file_name: photo.file_name.clone(),
        uploaded_on: photo.uploaded_on,
    }
}

fn photoset_snapshot(ps: &StoredPhotoset, with_photos: bool) -> RemotePhotoset {
    let mut snapshot = RemotePhotoset::new(RemoteId::new(ps.id.clone()), ps.title.clone());
    snapshot.caption = ps.caption.clone();
    snapshot.custom_reference = ps.custom_reference.clone();
    if with_photos {
        for photo in &ps.photos {
            snapshot
                .photos
                .insert(photo.file_name.clone(), photo_snapshot(photo));
        }
    }
    snapshot
}

fn group_snapshot(group: &StoredGroup) -> RemoteGroup {
    let mut snapshot = RemoteGroup::new(RemoteId::new(group.id.clone()), group.title.clone());
    snapshot.custom_reference = group.custom_reference.clone();
    for child in &group.groups {
        snapshot
            .groups
            .insert(child.title.clone(), group_snapshot(child));
    }
    for ps in &group.photosets {
        snapshot
            .photosets
            .insert(ps.title.clone(), photoset_snapshot(ps, false));
    }
    snapshot
}

// ============================================================================
// MockGalleryProvider
// ============================================================================

/// In-memory gallery service with scriptable failures.
#[derive(Debug)]
pub struct MockGalleryProvider {
    state: Mutex<State>,
}

impl MockGalleryProvider {
    /// Creates a provider holding a single empty root group titled "Root".
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                root: StoredGroup {
                    id: "root".to_string(),
                    title: "Root".to_string(),
                    custom_reference: None,
                    groups: Vec::new(),
                    photosets: Vec::new(),
                },
                next_id: 1,
                counts: Counts::default(),
                fail_auth: false,
                fail_group_titles: HashSet::new(),
                fail_photoset_load_refs: HashSet::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("mock provider lock poisoned")
    }

    // --- failure scripting ---

    pub fn fail_auth(&self) {
        self.lock().fail_auth = true;
    }

    /// Any attempt to create a group with this title fails.
    pub fn fail_group_create(&self, title: &str) {
        self.lock().fail_group_titles.insert(title.to_string());
    }

    /// Loading a photoset with this custom reference fails.
    pub fn fail_photoset_load(&self, reference: &str) {
        self.lock()
            .fail_photoset_load_refs
            .insert(reference.to_string());
    }

    // --- inspection ---

    pub fn counts(&self) -> Counts {
        self.lock().counts
    }

    pub fn has_group(&self, title: &str) -> bool {
        let state = self.lock();
        find_group_by_title(&state.root, title).is_some()
    }

    /// Custom reference of the group with the given title, if any.
    pub fn group_reference(&self, title: &str) -> Option<String> {
        let state = self.lock();
        find_group_by_title(&state.root, title).and_then(|g| g.custom_reference.clone())
    }

    /// All custom references in the stored tree, sorted.
    pub fn all_references(&self) -> Vec<String> {
        let state = self.lock();
        let mut refs = Vec::new();
        collect_references(&state.root, &mut refs);
        refs.sort();
        refs
    }

    /// File names in the photoset owned by the group with the given title.
    pub fn photo_names(&self, group_title: &str) -> Vec<String> {
        let state = self.lock();
        let Some(group) = find_group_by_title(&state.root, group_title) else {
            return Vec::new();
        };
        let mut names: Vec<String> = group
            .photosets
            .iter()
            .flat_map(|ps| ps.photos.iter().map(|p| p.file_name.clone()))
            .collect();
        names.sort();
        names
    }

    /// Rewrites the upload timestamp of every photo with this file name.
    pub fn set_uploaded_on(&self, file_name: &str, uploaded_on: DateTime<Utc>) {
        let mut state = self.lock();
        for_each_photoset_mut(&mut state.root, &mut |ps| {
            for photo in &mut ps.photos {
                if photo.file_name == file_name {
                    photo.uploaded_on = uploaded_on;
                }
            }
        });
    }

    /// Timestamp one hour in the past / future, for reupload-law tests.
    pub fn hour_before_now() -> DateTime<Utc> {
        Utc::now() - Duration::hours(1)
    }

    pub fn hour_after_now() -> DateTime<Utc> {
        Utc::now() + Duration::hours(1)
    }

    fn fresh_id(state: &mut State, prefix: &str) -> String {
        let id = format!("{prefix}-{}", state.next_id);
        state.next_id += 1;
        id
    }
}

impl Default for MockGalleryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IGalleryProvider for MockGalleryProvider {
    async fn authenticate(&self) -> anyhow::Result<()> {
        if self.lock().fail_auth {
            bail!("invalid credentials");
        }
        Ok(())
    }

    async fn load_group_hierarchy(&self) -> anyhow::Result<RemoteGroup> {
        Ok(group_snapshot(&self.lock().root))
    }

    async fn create_group(
        &self,
        parent: &RemoteGroup,
        update: &GroupUpdate,
    ) -> anyhow::Result<RemoteGroup> {
        let mut state = self.lock();
        if state.fail_group_titles.contains(&update.title) {
            bail!("server rejected group '{}'", update.title);
        }
        let id = Self::fresh_id(&mut state, "group");
        let stored = StoredGroup {
            id,
            title: update.title.clone(),
            custom_reference: Some(update.custom_reference.clone()),
            groups: Vec::new(),
            photosets: Vec::new(),
        };
        let snapshot = group_snapshot(&stored);
        let parent = find_group_mut(&mut state.root, parent.id.as_str())
            .ok_or_else(|| anyhow!("unknown parent group {}", parent.id))?;
        parent.groups.push(stored);
        state.counts.group_creates += 1;
        Ok(snapshot)
    }

    async fn create_photoset(
        &self,
        parent: &RemoteGroup,
        update: &PhotosetUpdate,
    ) -> anyhow::Result<RemotePhotoset> {
        let mut state = self.lock();
        let id = Self::fresh_id(&mut state, "ps");
        let stored = StoredPhotoset {
            id,
            title: update.title.clone(),
            caption: Some(update.caption.clone()),
            custom_reference: Some(update.custom_reference.clone()),
            photos: Vec::new(),
        };
        let snapshot = photoset_snapshot(&stored, false);
        let parent = find_group_mut(&mut state.root, parent.id.as_str())
            .ok_or_else(|| anyhow!("unknown parent group {}", parent.id))?;
        parent.photosets.push(stored);
        state.counts.photoset_creates += 1;
        Ok(snapshot)
    }

    async fn load_photoset(&self, photoset: &RemotePhotoset) -> anyhow::Result<RemotePhotoset> {
        let mut state = self.lock();
        state.counts.photoset_loads += 1;
        let failing = {
            let refs = &state.fail_photoset_load_refs;
            photoset
                .custom_reference
                .as_ref()
                .is_some_and(|r| refs.contains(r))
        };
        if failing {
            bail!("server error loading photoset '{}'", photoset.title);
        }
        let stored = find_photoset_mut(&mut state.root, photoset.id.as_str())
            .ok_or_else(|| anyhow!("unknown photoset {}", photoset.id))?;
        Ok(photoset_snapshot(stored, true))
    }

    async fn update_group_access(
        &self,
        _group: &RemoteGroup,
        _policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.lock().counts.group_access_updates += 1;
        Ok(())
    }

    async fn update_photoset_access(
        &self,
        _photoset: &RemotePhotoset,
        _policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.lock().counts.photoset_access_updates += 1;
        Ok(())
    }

    async fn update_photo_access(
        &self,
        _photo: &RemotePhoto,
        _policy: &AccessPolicy,
    ) -> anyhow::Result<()> {
        self.lock().counts.photo_access_updates += 1;
        Ok(())
    }

    async fn upload(
        &self,
        photoset: &RemotePhotoset,
        local_path: &Path,
        strip_root: &Path,
    ) -> anyhow::Result<RemotePhoto> {
        anyhow::ensure!(
            local_path.starts_with(strip_root),
            "upload path {} is outside the sync root",
            local_path.display()
        );
        anyhow::ensure!(
            local_path.is_file(),
            "upload source {} is not a file",
            local_path.display()
        );
        let file_name = local_path
            .file_name()
            .ok_or_else(|| anyhow!("upload path has no file name"))?
            .to_string_lossy()
            .into_owned();

        let mut state = self.lock();
        let id = Self::fresh_id(&mut state, "photo");
        let stored = StoredPhoto {
            id,
            file_name,
            uploaded_on: Utc::now(),
        };
        let snapshot = photo_snapshot(&stored);
        let ps = find_photoset_mut(&mut state.root, photoset.id.as_str())
            .ok_or_else(|| anyhow!("unknown photoset {}", photoset.id))?;
        ps.photos.push(stored);
        state.counts.uploads += 1;
        Ok(snapshot)
    }

    async fn replace_photo(
        &self,
        original: &RemotePhoto,
        replacement: &RemotePhoto,
    ) -> anyhow::Result<()> {
        let mut state = self.lock();
        let mut replaced = false;
        for_each_photoset_mut(&mut state.root, &mut |ps| {
            for photo in &mut ps.photos {
                if photo.id == original.id.as_str() {
                    photo.uploaded_on = replacement.uploaded_on;
                    replaced = true;
                }
            }
        });
        anyhow::ensure!(replaced, "unknown photo {}", original.id);
        state.counts.replaces += 1;
        Ok(())
    }

    async fn delete_photo(&self, photo: &RemotePhoto) -> anyhow::Result<()> {
        let mut state = self.lock();
        let mut deleted = false;
        for_each_photoset_mut(&mut state.root, &mut |ps| {
            let before = ps.photos.len();
            ps.photos.retain(|p| p.id != photo.id.as_str());
            if ps.photos.len() != before {
                deleted = true;
            }
        });
        anyhow::ensure!(deleted, "unknown photo {}", photo.id);
        state.counts.deletes += 1;
        Ok(())
    }
}
