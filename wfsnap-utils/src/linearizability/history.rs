//! Histories of operations performed on a shared object.
use std::collections::HashMap;
use std::ops::Index;

/// A process identifier.
pub type ProcessId = usize;

type EntryId = usize;

/// The start or end of an operation, as observed by the process performing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action<T> {
    Call(T),
    Response(T),
}

/// The entry marking the call of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallEntry<T> {
    pub id: EntryId,
    pub operation: T,
    /// The ID of the matching response entry.
    pub response: EntryId,
}

/// The entry marking the response of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseEntry<T> {
    pub id: EntryId,
    pub operation: T,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry<T> {
    Call(CallEntry<T>),
    Response(ResponseEntry<T>),
}

impl<T> Entry<T> {
    pub fn id(&self) -> EntryId {
        match self {
            Entry::Call(call) => call.id,
            Entry::Response(response) => response.id,
        }
    }
}

/// A complete history of operations, in the real-time order of their calls
/// and responses.
///
/// Entries can be lifted out of the history and later put back in the same
/// position, which is what allows a checker to backtrack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History<T> {
    entries: Vec<Entry<T>>,
    // When an entry is removed from this history, its index is recorded here.
    removed_from: Vec<Option<usize>>,
}

impl<T> History<T> {
    /// Creates a history from a sequence of actions, each tagged with the
    /// process that performed it.
    ///
    /// A response is matched with the most recent call made by the same process.
    ///
    /// # Panics
    ///
    /// Panics if a response has no matching call, or if a call has no response.
    pub fn from_actions(actions: Vec<(ProcessId, Action<T>)>) -> Self {
        let mut pending: HashMap<ProcessId, EntryId> = HashMap::new();
        let mut responses: HashMap<EntryId, EntryId> = HashMap::new();
        for (id, (process, action)) in actions.iter().enumerate() {
            match action {
                Action::Call(_) => {
                    if let Some(call) = pending.insert(*process, id) {
                        panic!("Process {process} made call {id} before call {call} returned");
                    }
                }
                Action::Response(_) => match pending.remove(process) {
                    Some(call) => {
                        responses.insert(call, id);
                    }
                    None => panic!("Response {id} of process {process} has no matching call"),
                },
            }
        }
        if let Some((process, call)) = pending.into_iter().next() {
            panic!("Call {call} of process {process} has no response");
        }

        let num_entries = actions.len();
        let entries = actions
            .into_iter()
            .enumerate()
            .map(|(id, (_, action))| match action {
                Action::Call(operation) => Entry::Call(CallEntry {
                    id,
                    operation,
                    response: responses[&id],
                }),
                Action::Response(operation) => Entry::Response(ResponseEntry { id, operation }),
            })
            .collect();
        Self {
            entries,
            removed_from: vec![None; num_entries],
        }
    }

    /// Returns the current index of the entry with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if no entry with that ID is currently in the history.
    pub fn index_of_id(&self, id: EntryId) -> usize {
        self.iter()
            .position(|e| e.id() == id)
            .unwrap_or_else(|| panic!("Entry {id} is not in the history"))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes the call entry at index `i`, along with its response.
    ///
    /// # Panics
    ///
    /// Panics if the entry at index `i` is not a call.
    pub fn lift(&mut self, i: usize) -> (Entry<T>, Entry<T>) {
        let call = self.remove(i);
        let response = match &call {
            Entry::Call(entry) => self.index_of_id(entry.response),
            Entry::Response(entry) => panic!("Cannot lift response entry {}", entry.id),
        };
        let response = self.remove(response);
        (call, response)
    }

    /// Puts back a call and response that were previously lifted, returning
    /// their indices.
    ///
    /// Lifted pairs must be put back in the reverse order of lifting.
    pub fn unlift(&mut self, call: Entry<T>, response: Entry<T>) -> (usize, usize) {
        let response_index = self.insert(response);
        let call_index = self.insert(call);
        (call_index, response_index)
    }

    /// # Panics
    ///
    /// Panics if input entry was not previously removed from the history.
    fn insert(&mut self, entry: Entry<T>) -> usize {
        match self.removed_from[entry.id()].take() {
            Some(index) => {
                self.entries.insert(index, entry);
                index
            }
            None => panic!(
                "Index that entry {} was removed from is unknown",
                entry.id()
            ),
        }
    }

    fn remove(&mut self, i: usize) -> Entry<T> {
        let entry = self.entries.remove(i);
        self.removed_from[entry.id()] = Some(i);
        entry
    }
}

impl<T> Index<usize> for History<T> {
    type Output = Entry<T>;

    fn index(&self, i: usize) -> &Self::Output {
        self.entries.index(i)
    }
}
